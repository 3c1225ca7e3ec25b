//! JSON record collections on top of a key-value store.
//!
//! Each collection is one JSON array serialized under a fixed key. Reads
//! are lenient: a missing or unreadable collection comes back empty so the
//! UI keeps working, while `load` tells the two cases apart.

use serde::{de::DeserializeOwned, Serialize};
use shared::{AcceptanceLog, BmiRecord, Child};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::storage::traits::KeyValueStorage;

/// A stored record with a unique id
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn record_id(&self) -> &str;
}

impl Record for Child {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for BmiRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for AcceptanceLog {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// The persisted collections and their storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Children,
    BmiRecords,
    AcceptanceLogs,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Children,
        Collection::BmiRecords,
        Collection::AcceptanceLogs,
    ];

    /// Storage key holding the serialized collection
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Children => "nutrition_children",
            Collection::BmiRecords => "nutrition_bmi_records",
            Collection::AcceptanceLogs => "nutrition_acceptance_logs",
        }
    }

    /// Default file name used when exporting the collection
    pub fn report_name(&self) -> &'static str {
        match self {
            Collection::Children => "children_data",
            Collection::BmiRecords => "bmi_records",
            Collection::AcceptanceLogs => "acceptance_logs",
        }
    }

    /// Parse the URL slug used by the export API
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "children" => Some(Collection::Children),
            "bmi-records" => Some(Collection::BmiRecords),
            "acceptance-logs" => Some(Collection::AcceptanceLogs),
            _ => None,
        }
    }
}

/// Outcome of reading a collection
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionState<T> {
    /// Nothing stored under the key yet
    Absent,
    Loaded(Vec<T>),
    /// Stored text could not be deserialized
    Corrupt { reason: String },
}

impl<T> CollectionState<T> {
    /// Records if loaded, otherwise empty
    pub fn into_records(self) -> Vec<T> {
        match self {
            CollectionState::Loaded(records) => records,
            CollectionState::Absent | CollectionState::Corrupt { .. } => Vec::new(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, CollectionState::Corrupt { .. })
    }
}

/// Generate an opaque unique id for a new record
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Generic read-modify-write access to record collections
#[derive(Clone)]
pub struct RecordStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl RecordStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The underlying key-value store, for values that are not record collections
    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        Arc::clone(&self.storage)
    }

    /// Read a collection, distinguishing absent from corrupt data.
    /// Only a failing storage backend is an error.
    pub async fn load<T: Record>(&self, collection: Collection) -> AppResult<CollectionState<T>> {
        let raw = match self.storage.get_item(collection.key()).await? {
            Some(raw) => raw,
            None => return Ok(CollectionState::Absent),
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => Ok(CollectionState::Loaded(records)),
            Err(e) => Ok(CollectionState::Corrupt {
                reason: e.to_string(),
            }),
        }
    }

    /// All records in stored order. Absent, corrupt or unreadable collections yield an empty list.
    pub async fn get_all<T: Record>(&self, collection: Collection) -> Vec<T> {
        match self.load(collection).await {
            Ok(CollectionState::Corrupt { reason }) => {
                warn!(
                    "Collection '{}' is corrupt, treating as empty: {}",
                    collection.key(),
                    reason
                );
                Vec::new()
            }
            Ok(state) => state.into_records(),
            Err(e) => {
                warn!("Failed to read collection '{}': {}", collection.key(), e);
                Vec::new()
            }
        }
    }

    /// Replace the record with the same id in place, or append it
    pub async fn upsert<T: Record>(&self, collection: Collection, record: T) -> AppResult<()> {
        let mut records: Vec<T> = self.load_for_write(collection).await?;

        match records.iter().position(|r| r.record_id() == record.record_id()) {
            Some(index) => {
                debug!("Replacing record {} in '{}'", record.record_id(), collection.key());
                records[index] = record;
            }
            None => {
                debug!("Appending record {} to '{}'", record.record_id(), collection.key());
                records.push(record);
            }
        }

        self.write_all(collection, &records).await
    }

    /// Remove the record with `id`. Returns whether a record was removed; a missing id is not an error.
    pub async fn delete_by_id<T: Record>(&self, collection: Collection, id: &str) -> AppResult<bool> {
        let mut records: Vec<T> = self.load_for_write(collection).await?;
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        let removed = records.len() < before;

        self.write_all(collection, &records).await?;

        if removed {
            info!("Deleted record {} from '{}'", id, collection.key());
        }
        Ok(removed)
    }

    /// Append without checking for an existing id
    pub async fn append<T: Record>(&self, collection: Collection, record: T) -> AppResult<()> {
        let mut records: Vec<T> = self.load_for_write(collection).await?;
        records.push(record);
        self.write_all(collection, &records).await
    }

    /// Current records as the base of a rewrite. A corrupt collection starts
    /// fresh; a failing backend aborts the mutation so nothing is overwritten.
    async fn load_for_write<T: Record>(&self, collection: Collection) -> AppResult<Vec<T>> {
        match self.load(collection).await? {
            CollectionState::Corrupt { reason } => {
                warn!(
                    "Overwriting corrupt collection '{}': {}",
                    collection.key(),
                    reason
                );
                Ok(Vec::new())
            }
            state => Ok(state.into_records()),
        }
    }

    async fn write_all<T: Record>(&self, collection: Collection, records: &[T]) -> AppResult<()> {
        let serialized = serde_json::to_string(records)
            .map_err(|e| AppError::Internal(format!("Failed to serialize '{}': {}", collection.key(), e)))?;
        self.storage.set_item(collection.key(), &serialized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;
    use shared::{AcceptanceStatus, BmiCategory, Gender, MealType};

    async fn setup_store() -> RecordStore {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        RecordStore::new(Arc::new(db))
    }

    fn child(id: &str, name: &str) -> Child {
        Child {
            id: id.to_string(),
            name: name.to_string(),
            age: 5,
            gender: Gender::Male,
            height_cm: 105.0,
            weight_kg: 17.0,
            bmi: 15.4,
            bmi_category: BmiCategory::Normal,
            created_at: "2025-06-01T09:00:00+00:00".to_string(),
            updated_at: "2025-06-01T09:00:00+00:00".to_string(),
        }
    }

    fn log(id: &str) -> AcceptanceLog {
        AcceptanceLog {
            id: id.to_string(),
            child_id: "c1".to_string(),
            recipe_id: "5".to_string(),
            recipe_name: "Poha".to_string(),
            date: "2025-06-01T08:00:00+00:00".to_string(),
            status: AcceptanceStatus::FullyEaten,
            meal_type: MealType::Breakfast,
        }
    }

    #[tokio::test]
    async fn test_get_all_on_absent_collection_is_empty() {
        let store = setup_store().await;

        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert!(children.is_empty());

        let state = store.load::<Child>(Collection::Children).await.unwrap();
        assert_eq!(state, CollectionState::Absent);
    }

    #[tokio::test]
    async fn test_upsert_then_get_all_returns_record_intact() {
        let store = setup_store().await;
        let asha = child("c1", "Asha");

        store.upsert(Collection::Children, asha.clone()).await.unwrap();

        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert_eq!(children, vec![asha]);
    }

    #[tokio::test]
    async fn test_upsert_same_id_replaces_in_place() {
        let store = setup_store().await;
        store.upsert(Collection::Children, child("c1", "Asha")).await.unwrap();
        store.upsert(Collection::Children, child("c2", "Ravi")).await.unwrap();
        store.upsert(Collection::Children, child("c3", "Meena")).await.unwrap();

        let mut renamed = child("c2", "Ravi Kumar");
        renamed.weight_kg = 18.5;
        store.upsert(Collection::Children, renamed.clone()).await.unwrap();

        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert_eq!(children.len(), 3);
        assert_eq!(children[1], renamed);
        let ids: Vec<&str> = children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[tokio::test]
    async fn test_delete_by_id_removes_exactly_one() {
        let store = setup_store().await;
        for (id, name) in [("c1", "Asha"), ("c2", "Ravi"), ("c3", "Meena")] {
            store.upsert(Collection::Children, child(id, name)).await.unwrap();
        }

        let removed = store.delete_by_id::<Child>(Collection::Children, "c2").await.unwrap();
        assert!(removed);

        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.id != "c2"));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let store = setup_store().await;
        store.upsert(Collection::Children, child("c1", "Asha")).await.unwrap();

        let removed = store.delete_by_id::<Child>(Collection::Children, "nope").await.unwrap();
        assert!(!removed);

        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert_eq!(children.len(), 1);
    }

    #[tokio::test]
    async fn test_append_does_not_dedupe() {
        let store = setup_store().await;

        store.append(Collection::AcceptanceLogs, log("l1")).await.unwrap();
        store.append(Collection::AcceptanceLogs, log("l1")).await.unwrap();

        let logs: Vec<AcceptanceLog> = store.get_all(Collection::AcceptanceLogs).await;
        assert_eq!(logs.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_collection_reads_as_empty_but_is_reported() {
        let db = DbConnection::init_test().await.unwrap();
        db.set_item(Collection::Children.key(), "{not json").await.unwrap();
        let store = RecordStore::new(Arc::new(db));

        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert!(children.is_empty());

        let state = store.load::<Child>(Collection::Children).await.unwrap();
        assert!(state.is_corrupt());
    }

    #[tokio::test]
    async fn test_upsert_over_corrupt_collection_starts_fresh() {
        let db = DbConnection::init_test().await.unwrap();
        db.set_item(Collection::Children.key(), "[{\"id\": 42}]").await.unwrap();
        let store = RecordStore::new(Arc::new(db));

        store.upsert(Collection::Children, child("c1", "Asha")).await.unwrap();

        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "c1");
    }

    #[tokio::test]
    async fn test_write_over_quota_surfaces_storage_full() {
        let db = DbConnection::init_in_memory(64).await.unwrap();
        let store = RecordStore::new(Arc::new(db));

        let err = store
            .upsert(Collection::Children, child("c1", "Asha"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StorageFull { quota: 64, .. }));
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = setup_store().await;
        store.upsert(Collection::Children, child("c1", "Asha")).await.unwrap();
        store.append(Collection::AcceptanceLogs, log("l1")).await.unwrap();

        let records: Vec<BmiRecord> = store.get_all(Collection::BmiRecords).await;
        assert!(records.is_empty());

        let keys = store.storage().list_keys().await.unwrap();
        assert_eq!(keys, vec!["nutrition_acceptance_logs", "nutrition_children"]);
    }

    /// Storage whose reads fail while `failing` is set
    struct FlakyStorage {
        inner: DbConnection,
        failing: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl KeyValueStorage for FlakyStorage {
        async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
            if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(AppError::StorageUnavailable("read failed".to_string()));
            }
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> AppResult<bool> {
            self.inner.remove_item(key).await
        }

        async fn list_keys(&self) -> AppResult<Vec<String>> {
            self.inner.list_keys().await
        }
    }

    #[tokio::test]
    async fn test_failed_read_aborts_mutation_without_losing_records() {
        let storage = Arc::new(FlakyStorage {
            inner: DbConnection::init_test().await.unwrap(),
            failing: std::sync::atomic::AtomicBool::new(false),
        });
        let store = RecordStore::new(storage.clone());
        for id in ["l1", "l2", "l3"] {
            store.append(Collection::AcceptanceLogs, log(id)).await.unwrap();
        }
        store.upsert(Collection::Children, child("c1", "Asha")).await.unwrap();

        storage.failing.store(true, std::sync::atomic::Ordering::SeqCst);
        let err = store.append(Collection::AcceptanceLogs, log("l4")).await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
        assert!(store.upsert(Collection::Children, child("c2", "Ravi")).await.is_err());
        assert!(store.delete_by_id::<Child>(Collection::Children, "c1").await.is_err());

        storage.failing.store(false, std::sync::atomic::Ordering::SeqCst);
        let logs: Vec<AcceptanceLog> = store.get_all(Collection::AcceptanceLogs).await;
        assert_eq!(logs.len(), 3);
        let children: Vec<Child> = store.get_all(Collection::Children).await;
        assert_eq!(children, vec![child("c1", "Asha")]);
    }

    #[test]
    fn test_collection_slugs() {
        for collection in Collection::ALL {
            let slug = match collection {
                Collection::Children => "children",
                Collection::BmiRecords => "bmi-records",
                Collection::AcceptanceLogs => "acceptance-logs",
            };
            assert_eq!(Collection::from_slug(slug), Some(collection));
        }
        assert_eq!(Collection::from_slug("recipes"), None);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
