// crates/epochs-store/src/admin.rs
//
// Host-side administration of epoch records.
//
// The scheduler only mutates existing records; creating, deleting and
// bulk-loading records is the host's job and goes through these helpers,
// which validate records before they reach the store.

use epochs_core::error::EpochError;
use epochs_core::genesis::EpochGenesis;
use epochs_core::record::EpochRecord;
use epochs_core::traits::EpochStore;

/// Add a new record. Fails if the record is invalid or its identifier is taken.
pub fn add_epoch_record(store: &dyn EpochStore, record: EpochRecord) -> Result<(), EpochError> {
    record.validate()?;
    if store.get(&record.identifier)?.is_some() {
        return Err(EpochError::DuplicateIdentifier(record.identifier));
    }
    store.set(&record)?;
    tracing::info!(
        "Added epoch track {} (start={}, duration={:?})",
        record.identifier,
        record.start_time,
        record.duration
    );
    Ok(())
}

/// Delete a record. Fails with `NotFound` if no record has this identifier.
pub fn delete_epoch_record(store: &dyn EpochStore, identifier: &str) -> Result<(), EpochError> {
    if store.get(identifier)?.is_none() {
        return Err(EpochError::NotFound(format!("epoch track {}", identifier)));
    }
    store.delete(identifier)?;
    tracing::info!("Deleted epoch track {}", identifier);
    Ok(())
}

/// List every record in store iteration order.
pub fn all_epoch_records(store: &dyn EpochStore) -> Result<Vec<EpochRecord>, EpochError> {
    let mut records = Vec::new();
    store.iterate(&mut |_, record| {
        records.push(record);
        Ok(true)
    })?;
    Ok(records)
}

/// Validate a genesis and write all its records.
pub fn init_genesis(store: &dyn EpochStore, genesis: &EpochGenesis) -> Result<(), EpochError> {
    genesis.validate()?;
    for record in &genesis.epochs {
        if store.get(&record.identifier)?.is_some() {
            return Err(EpochError::DuplicateIdentifier(record.identifier.clone()));
        }
    }
    for record in &genesis.epochs {
        store.set(record)?;
    }
    tracing::info!("Initialized {} epoch tracks from genesis", genesis.epochs.len());
    Ok(())
}

/// Export the current records as a genesis.
pub fn export_genesis(store: &dyn EpochStore) -> Result<EpochGenesis, EpochError> {
    Ok(EpochGenesis::new(all_epoch_records(store)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEpochStore;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn record(id: &str) -> EpochRecord {
        EpochRecord::new(id, Utc.timestamp_opt(0, 0).unwrap(), Duration::from_secs(60)).unwrap()
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let store = MemoryEpochStore::new();
        add_epoch_record(&store, record("day")).unwrap();
        let err = add_epoch_record(&store, record("day")).unwrap_err();
        assert!(matches!(err, EpochError::DuplicateIdentifier(_)));
    }

    #[test]
    fn test_add_rejects_invalid_record() {
        let store = MemoryEpochStore::new();
        let mut bad = record("day");
        bad.duration = Duration::ZERO;
        assert!(matches!(
            add_epoch_record(&store, bad),
            Err(EpochError::InvalidRecord(_))
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let store = MemoryEpochStore::new();
        assert!(matches!(
            delete_epoch_record(&store, "nope"),
            Err(EpochError::NotFound(_))
        ));
        add_epoch_record(&store, record("day")).unwrap();
        delete_epoch_record(&store, "day").unwrap();
        assert!(store.get("day").unwrap().is_none());
    }

    #[test]
    fn test_genesis_import_export() {
        let store = MemoryEpochStore::new();
        let genesis = EpochGenesis::standard(Utc.timestamp_opt(0, 0).unwrap());
        init_genesis(&store, &genesis).unwrap();
        assert_eq!(export_genesis(&store).unwrap(), genesis);
    }

    #[test]
    fn test_genesis_does_not_partially_apply_on_conflict() {
        let store = MemoryEpochStore::new();
        store.set(&record("week")).unwrap();
        let genesis = EpochGenesis::standard(Utc.timestamp_opt(0, 0).unwrap());
        assert!(init_genesis(&store, &genesis).is_err());
        assert!(store.get("day").unwrap().is_none());
    }
}
