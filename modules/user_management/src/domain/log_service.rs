use std::cmp::Reverse;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::contract::model::{Log, NewLog};
use crate::domain::error::DomainError;
use crate::domain::store::RecordStore;
use crate::domain::validation::require;

/// Append-only activity log over the store port.
#[derive(Clone)]
pub struct LogService {
    store: Arc<dyn RecordStore<Log>>,
}

impl LogService {
    pub fn new(store: Arc<dyn RecordStore<Log>>) -> Self {
        Self { store }
    }

    #[instrument(name = "user_management.logs.get_all", skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Log>, DomainError> {
        Ok(self.store.get_all().await?)
    }

    /// Exact, case-sensitive match on `action`, newest first.
    #[instrument(name = "user_management.logs.filter_all_by_action", skip(self))]
    pub async fn filter_all_by_action(&self, action: &str) -> Result<Vec<Log>, DomainError> {
        if action.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "action",
                "Action must not be empty",
            ));
        }

        let mut logs: Vec<Log> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|l| l.action == action)
            .collect();
        newest_first(&mut logs);
        debug!(count = logs.len(), "Filtered logs by action");
        Ok(logs)
    }

    #[instrument(name = "user_management.logs.filter_all_by_user_id", skip(self))]
    pub async fn filter_all_by_user_id(&self, user_id: i64) -> Result<Vec<Log>, DomainError> {
        let logs = self.store.get_all().await?;
        Ok(logs.into_iter().filter(|l| l.user_id == user_id).collect())
    }

    #[instrument(name = "user_management.logs.filter_all_by_id", skip(self))]
    pub async fn filter_all_by_id(&self, id: i64) -> Result<Option<Log>, DomainError> {
        let logs = self.store.get_all().await?;
        Ok(logs.into_iter().find(|l| l.id == id))
    }

    #[instrument(
        name = "user_management.logs.add_log",
        skip(self, new_log),
        fields(user_id = new_log.user_id, action = %new_log.action)
    )]
    pub async fn add_log(&self, new_log: NewLog) -> Result<Log, DomainError> {
        if new_log.user_id <= 0 {
            return Err(DomainError::validation("UserId", "UserId is required"));
        }
        require("Owner", &new_log.owner)?;
        require("Action", &new_log.action)?;
        require("Change", &new_log.change)?;

        let log = self.store.create(new_log.into_record()).await?;
        debug!(log_id = log.id, "Log appended");
        Ok(log)
    }

    /// One page of logs, newest first. Pages are 1-based.
    #[instrument(name = "user_management.logs.get_paged", skip(self))]
    pub async fn get_paged(&self, page: i64, page_size: i64) -> Result<Vec<Log>, DomainError> {
        if page <= 0 {
            return Err(DomainError::invalid_argument(
                "page",
                "Page must be greater than zero",
            ));
        }
        if page_size <= 0 {
            return Err(DomainError::invalid_argument(
                "page_size",
                "Page size must be greater than zero",
            ));
        }

        let mut logs = self.store.get_all().await?;
        newest_first(&mut logs);

        let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        Ok(logs.into_iter().skip(skip).take(take).collect())
    }

    #[instrument(name = "user_management.logs.count", skip(self))]
    pub async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.store.get_all().await?.len())
    }
}

// Equal timestamps (seed data) fall back to id so pages stay disjoint.
fn newest_first(logs: &mut [Log]) {
    logs.sort_by_key(|l| Reverse((l.timestamp, l.id)));
}
