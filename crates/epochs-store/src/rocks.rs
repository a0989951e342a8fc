// crates/epochs-store/src/rocks.rs
//
// RocksDB-backed persistent storage for epoch records.
//
// Key format:
//   - `epoch:{identifier}` -> JSON-serialized EpochRecord
//
// RocksDB orders keys bytewise, so a prefix scan visits records in
// identifier order, which gives the scheduler its stable iteration order.

use rocksdb::{DBWithThreadMode, MultiThreaded, Options};

use epochs_core::error::EpochError;
use epochs_core::record::EpochRecord;
use epochs_core::traits::EpochStore;

const RECORD_PREFIX: &str = "epoch:";

/// RocksDB wrapper implementing the `EpochStore` trait.
#[derive(Debug)]
pub struct RocksEpochStore {
    db: DBWithThreadMode<MultiThreaded>,
}

impl RocksEpochStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, EpochError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path).map_err(|e| {
            EpochError::Storage(format!("Failed to open RocksDB at {}: {}", path, e))
        })?;

        tracing::debug!("Opened epoch store at {}", path);
        Ok(Self { db })
    }

    /// Build the record key: `epoch:{identifier}`.
    fn record_key(identifier: &str) -> Vec<u8> {
        format!("{}{}", RECORD_PREFIX, identifier).into_bytes()
    }

    /// Read every record under the record prefix, in key order.
    fn scan(&self) -> Result<Vec<EpochRecord>, EpochError> {
        let prefix = RECORD_PREFIX.as_bytes();
        let mut records = Vec::new();

        for item in self.db.prefix_iterator(prefix) {
            let (key, value) = item
                .map_err(|e| EpochError::Storage(format!("RocksDB iteration error: {}", e)))?;

            // Stop when the prefix no longer matches.
            if !key.starts_with(prefix) {
                break;
            }

            records.push(serde_json::from_slice(&value)?);
        }

        Ok(records)
    }
}

impl EpochStore for RocksEpochStore {
    fn iterate(
        &self,
        visitor: &mut dyn FnMut(usize, EpochRecord) -> Result<bool, EpochError>,
    ) -> Result<(), EpochError> {
        for (index, record) in self.scan()?.into_iter().enumerate() {
            if !visitor(index, record)? {
                break;
            }
        }
        Ok(())
    }

    fn get(&self, identifier: &str) -> Result<Option<EpochRecord>, EpochError> {
        let bytes = self
            .db
            .get(Self::record_key(identifier))
            .map_err(|e| EpochError::Storage(format!("RocksDB get failed: {}", e)))?;
        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn set(&self, record: &EpochRecord) -> Result<(), EpochError> {
        let json = serde_json::to_vec(record)?;
        self.db
            .put(Self::record_key(&record.identifier), json)
            .map_err(|e| EpochError::Storage(format!("RocksDB put failed: {}", e)))
    }

    fn delete(&self, identifier: &str) -> Result<(), EpochError> {
        self.db
            .delete(Self::record_key(identifier))
            .map_err(|e| EpochError::Storage(format!("RocksDB delete failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use uuid::Uuid;

    fn temp_db_path(label: &str) -> String {
        let path = std::env::temp_dir().join(format!("epochs_test_{}_{}", label, Uuid::now_v7()));
        path.to_string_lossy().to_string()
    }

    fn record(id: &str, secs: u64) -> EpochRecord {
        EpochRecord::new(id, Utc.timestamp_opt(0, 0).unwrap(), Duration::from_secs(secs)).unwrap()
    }

    #[test]
    fn test_record_key_format() {
        assert_eq!(RocksEpochStore::record_key("day"), b"epoch:day".to_vec());
    }

    #[test]
    fn test_set_get_delete() {
        let path = temp_db_path("set_get");
        let store = RocksEpochStore::open(&path).unwrap();

        store.set(&record("day", 86_400)).unwrap();
        assert_eq!(store.get("day").unwrap(), Some(record("day", 86_400)));

        store.delete("day").unwrap();
        assert_eq!(store.get("day").unwrap(), None);

        drop(store);
        let _ = std::fs::remove_dir_all(&path);
    }

    #[test]
    fn test_iterate_in_key_order() {
        let path = temp_db_path("iterate");
        let store = RocksEpochStore::open(&path).unwrap();
        store.set(&record("week", 604_800)).unwrap();
        store.set(&record("day", 86_400)).unwrap();

        let mut ids = Vec::new();
        store
            .iterate(&mut |_, r| {
                ids.push(r.identifier);
                Ok(true)
            })
            .unwrap();
        assert_eq!(ids, vec!["day".to_string(), "week".to_string()]);

        drop(store);
        let _ = std::fs::remove_dir_all(&path);
    }

    #[test]
    fn test_records_survive_reopen() {
        let path = temp_db_path("reopen");
        {
            let store = RocksEpochStore::open(&path).unwrap();
            let mut r = record("hour", 3_600);
            r.epoch_counting_started = true;
            r.current_epoch = 4;
            store.set(&r).unwrap();
        }
        let store = RocksEpochStore::open(&path).unwrap();
        let r = store.get("hour").unwrap().unwrap();
        assert_eq!(r.current_epoch, 4);
        assert!(r.epoch_counting_started);

        drop(store);
        let _ = std::fs::remove_dir_all(&path);
    }
}
