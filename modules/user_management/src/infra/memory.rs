//! Lock-protected in-process store, used by tests and `--mock` runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::store::{Record, RecordStore, StoreError};

struct Table<R> {
    next_id: i64,
    rows: BTreeMap<i64, R>,
}

impl<R: Record> Table<R> {
    /// Another row (not `except_id`) already holding the record's unique key.
    fn unique_clash(&self, record: &R, except_id: Option<i64>) -> Option<&'static str> {
        let key = record.unique_key()?;
        self.rows
            .values()
            .filter(|r| Some(r.id()) != except_id)
            .filter_map(Record::unique_key)
            .any(|k| k == key)
            .then_some(key.field)
    }
}

pub struct InMemoryStore<R> {
    table: RwLock<Table<R>>,
}

impl<R: Record> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> InMemoryStore<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Pre-populated store. Records keep their ids and skip unique checks;
    /// new ids continue above the highest one given.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let rows: BTreeMap<i64, R> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = rows.keys().next_back().map_or(1, |max| max + 1);
        Self {
            table: RwLock::new(Table { next_id, rows }),
        }
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryStore<R> {
    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.table.read().rows.values().cloned().collect())
    }

    async fn create(&self, record: R) -> Result<R, StoreError> {
        let mut table = self.table.write();
        if let Some(field) = table.unique_clash(&record, None) {
            return Err(StoreError::UniqueViolation {
                kind: R::KIND,
                field,
            });
        }
        let id = table.next_id;
        table.next_id += 1;
        let record = record.with_id(id);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: R) -> Result<(), StoreError> {
        let mut table = self.table.write();
        let id = record.id();
        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound { kind: R::KIND, id });
        }
        if let Some(field) = table.unique_clash(&record, Some(id)) {
            return Err(StoreError::UniqueViolation {
                kind: R::KIND,
                field,
            });
        }
        table.rows.insert(id, record);
        Ok(())
    }

    async fn delete(&self, record: &R) -> Result<bool, StoreError> {
        Ok(self.table.write().rows.remove(&record.id()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::User;
    use chrono::NaiveDate;

    fn user(email: &str) -> User {
        User {
            id: 0,
            forename: "Ann".into(),
            surname: "Lee".into(),
            email: email.into(),
            is_active: true,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = InMemoryStore::<User>::new();
        let a = store.create(user("a@example.com")).await.unwrap();
        let b = store.create(user("b@example.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.delete(&b).await.unwrap());
        let c = store.create(user("c@example.com")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn unique_key_enforced_on_create_and_update() {
        let store = InMemoryStore::<User>::new();
        store.create(user("a@example.com")).await.unwrap();
        let b = store.create(user("b@example.com")).await.unwrap();

        let err = store.create(user("a@example.com")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation { kind: "User", field: "email" }
        ));

        let mut clash = b.clone();
        clash.email = "a@example.com".into();
        assert!(matches!(
            store.update(clash).await,
            Err(StoreError::UniqueViolation { .. })
        ));

        // Keeping its own email is not a clash.
        let mut renamed = b;
        renamed.forename = "Bea".into();
        store.update(renamed).await.unwrap();
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_record() {
        let store = InMemoryStore::<User>::new();
        let mut ghost = user("ghost@example.com");
        ghost.id = 99;
        assert!(matches!(
            store.update(ghost.clone()).await,
            Err(StoreError::NotFound { id: 99, .. })
        ));
        assert!(!store.delete(&ghost).await.unwrap());
    }

    #[tokio::test]
    async fn seeded_store_continues_above_highest_id() {
        let mut seeded = user("seed@example.com");
        seeded.id = 11;
        let store = InMemoryStore::with_records([seeded]);
        let created = store.create(user("new@example.com")).await.unwrap();
        assert_eq!(created.id, 12);
        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }
}
