use std::sync::Arc;

use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::UserManagementConfig;
use crate::contract::model::{Log, User};
use crate::domain::log_service::LogService;
use crate::domain::service::UserService;
use crate::domain::store::RecordStore;
use crate::infra::memory::InMemoryStore;
use crate::infra::seed;
use crate::infra::storage::sea_orm_store::SeaOrmStore;

/// Wiring for the user_management module: stores, services and REST routes.
#[derive(Clone)]
pub struct UserManagement {
    users: Arc<UserService>,
    logs: Arc<LogService>,
    config: Arc<UserManagementConfig>,
}

impl UserManagement {
    /// Wire services over caller-provided stores.
    pub fn new(
        user_store: Arc<dyn RecordStore<User>>,
        log_store: Arc<dyn RecordStore<Log>>,
        config: UserManagementConfig,
    ) -> Self {
        debug!(
            "Loaded user_management config: default_page_size={}, max_page_size={}",
            config.default_page_size, config.max_page_size
        );
        Self {
            users: Arc::new(UserService::new(user_store)),
            logs: Arc::new(LogService::new(log_store)),
            config: Arc::new(config),
        }
    }

    /// Process-local stores, seeded with the demo data when configured.
    pub fn in_memory(config: UserManagementConfig) -> Self {
        info!("Initializing user_management module with in-memory store");
        let (users, logs) = if config.seed_demo_data {
            (
                InMemoryStore::with_records(seed::demo_users()),
                InMemoryStore::with_records(seed::demo_logs()),
            )
        } else {
            (InMemoryStore::new(), InMemoryStore::new())
        };
        Self::new(Arc::new(users), Arc::new(logs), config)
    }

    /// Connect, migrate and (optionally) seed a SQLite database.
    pub async fn sea_orm(
        dsn: &str,
        max_conns: Option<u32>,
        config: UserManagementConfig,
    ) -> anyhow::Result<Self> {
        info!("Initializing user_management module with database store");
        let store = SeaOrmStore::connect(dsn, max_conns).await?;
        store.migrate().await?;
        if config.seed_demo_data {
            store
                .seed_if_empty(seed::demo_users(), seed::demo_logs())
                .await?;
        }

        let store = Arc::new(store);
        Ok(Self::new(store.clone(), store, config))
    }

    pub fn users(&self) -> Arc<UserService> {
        self.users.clone()
    }

    pub fn logs(&self) -> Arc<LogService> {
        self.logs.clone()
    }

    pub fn router(&self) -> axum::Router {
        info!("Registering user_management REST routes");
        routes::register_routes(
            axum::Router::new(),
            self.users.clone(),
            self.logs.clone(),
            self.config.clone(),
        )
    }
}
