// crates/epochs-store/src/memory.rs
//
// In-memory epoch record store implementing the `EpochStore` trait.
//
// Records are kept in a BTreeMap keyed by identifier so that iteration
// order is stable across ticks. Suitable for tests and simulations.

use std::collections::BTreeMap;
use std::sync::RwLock;

use epochs_core::error::EpochError;
use epochs_core::record::EpochRecord;
use epochs_core::traits::EpochStore;

/// In-memory store of epoch records, ordered by identifier.
#[derive(Debug, Default)]
pub struct MemoryEpochStore {
    records: RwLock<BTreeMap<String, EpochRecord>>,
}

impl MemoryEpochStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given records.
    pub fn with_records(records: impl IntoIterator<Item = EpochRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.identifier.clone(), r))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }

    /// Return the number of records currently stored.
    pub fn len(&self) -> Result<usize, EpochError> {
        Ok(self.read()?.len())
    }

    /// Return whether the store is empty.
    pub fn is_empty(&self) -> Result<bool, EpochError> {
        Ok(self.len()? == 0)
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, EpochRecord>>, EpochError> {
        self.records
            .read()
            .map_err(|_| EpochError::Storage("epoch store lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, EpochRecord>>, EpochError> {
        self.records
            .write()
            .map_err(|_| EpochError::Storage("epoch store lock poisoned".to_string()))
    }
}

impl EpochStore for MemoryEpochStore {
    fn iterate(
        &self,
        visitor: &mut dyn FnMut(usize, EpochRecord) -> Result<bool, EpochError>,
    ) -> Result<(), EpochError> {
        // Snapshot under the lock, visit without it: visitors may read or
        // write the store themselves.
        let snapshot: Vec<EpochRecord> = self.read()?.values().cloned().collect();
        for (index, record) in snapshot.into_iter().enumerate() {
            if !visitor(index, record)? {
                break;
            }
        }
        Ok(())
    }

    fn get(&self, identifier: &str) -> Result<Option<EpochRecord>, EpochError> {
        Ok(self.read()?.get(identifier).cloned())
    }

    fn set(&self, record: &EpochRecord) -> Result<(), EpochError> {
        self.write()?
            .insert(record.identifier.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, identifier: &str) -> Result<(), EpochError> {
        self.write()?.remove(identifier);
        Ok(())
    }
}
