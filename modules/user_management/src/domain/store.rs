//! Persistence port shared by both services.
//!
//! One generic trait covers every record type; implementations decide how ids
//! are assigned and how unique keys are enforced. Unique keys are checked by
//! the store itself so that concurrent writers cannot both pass a
//! service-level check and then insert duplicates.

use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{Log, User};

/// A field whose value must be unique across all records of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub field: &'static str,
    pub value: String,
}

/// A storable entity.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn id(&self) -> i64;

    /// Copy of the record carrying the store-assigned id.
    fn with_id(self, id: i64) -> Self;

    fn unique_key(&self) -> Option<UniqueKey> {
        None
    }
}

impl Record for User {
    const KIND: &'static str = "User";

    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    fn unique_key(&self) -> Option<UniqueKey> {
        Some(UniqueKey {
            field: "email",
            value: self.email.clone(),
        })
    }
}

impl Record for Log {
    const KIND: &'static str = "Log";

    fn id(&self) -> i64 {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} with id {id} does not exist")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{kind}.{field} must be unique")]
    UniqueViolation {
        kind: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Typed create/read/update/delete over one record kind.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Every record, ascending id.
    async fn get_all(&self) -> Result<Vec<R>, StoreError>;

    /// Persist a new record. The input id is ignored; the returned copy carries the assigned one.
    async fn create(&self, record: R) -> Result<R, StoreError>;

    /// Replace the record with the same id.
    async fn update(&self, record: R) -> Result<(), StoreError>;

    /// Returns true if a record was removed.
    async fn delete(&self, record: &R) -> Result<bool, StoreError>;
}
