//! SeaORM-backed store for users and logs.
//!
//! One connection handle serves both record kinds. Ids come from SQLite
//! `AUTOINCREMENT`, so deleted ids are never handed out again, and email
//! uniqueness is enforced by the `users.email` unique index.

use anyhow::Context;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryOrder, SqlErr,
};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::contract::model::{Log, User};
use crate::domain::store::{Record, RecordStore, StoreError};
use crate::infra::storage::entity::{logs, users};
use crate::infra::storage::mapper::{log_active_model, user_active_model};
use crate::infra::storage::migrations::Migrator;

/// True for DSNs that open a private in-memory database per connection.
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

#[derive(Clone)]
pub struct SeaOrmStore {
    conn: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Open a pool for `dsn`. In-memory databases are pinned to one connection,
    /// otherwise every pooled connection would see its own empty database.
    pub async fn connect(dsn: &str, max_conns: Option<u32>) -> anyhow::Result<Self> {
        let mut opts = ConnectOptions::new(dsn.to_owned());
        if is_memory_dsn(dsn) {
            opts.max_connections(1).min_connections(1);
        } else if let Some(max) = max_conns {
            opts.max_connections(max);
        }
        opts.sqlx_logging(false);

        let conn = Database::connect(opts)
            .await
            .with_context(|| format!("failed to connect to {dsn}"))?;
        debug!(dsn, "Database connected");
        Ok(Self::new(conn))
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running user_management database migrations");
        Migrator::up(&self.conn, None)
            .await
            .context("user_management migrations failed")?;
        info!("user_management database migrations completed successfully");
        Ok(())
    }

    /// Insert the given rows with their ids, but only into empty tables.
    pub async fn seed_if_empty(&self, users: Vec<User>, logs: Vec<Log>) -> anyhow::Result<()> {
        if users::Entity::find()
            .count(&self.conn)
            .await
            .context("count users failed")?
            == 0
            && !users.is_empty()
        {
            let count = users.len();
            users::Entity::insert_many(users.into_iter().map(|u| user_active_model(u, true)))
                .exec(&self.conn)
                .await
                .context("seed users failed")?;
            info!(count, "Seeded users");
        }

        if logs::Entity::find()
            .count(&self.conn)
            .await
            .context("count logs failed")?
            == 0
            && !logs.is_empty()
        {
            let count = logs.len();
            logs::Entity::insert_many(logs.into_iter().map(|l| log_active_model(l, true)))
                .exec(&self.conn)
                .await
                .context("seed logs failed")?;
            info!(count, "Seeded logs");
        }
        Ok(())
    }
}

fn write_error<R: Record>(err: DbErr, record: &R, op: &'static str) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        if let Some(key) = record.unique_key() {
            return StoreError::UniqueViolation {
                kind: R::KIND,
                field: key.field,
            };
        }
    }
    if matches!(err, DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) {
        return StoreError::NotFound {
            kind: R::KIND,
            id: record.id(),
        };
    }
    StoreError::Backend(anyhow::Error::new(err).context(format!("{} {op} failed", R::KIND)))
}

fn read_error(err: DbErr, kind: &'static str) -> StoreError {
    StoreError::Backend(anyhow::Error::new(err).context(format!("{kind} get_all failed")))
}

#[async_trait]
impl RecordStore<User> for SeaOrmStore {
    async fn get_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .map_err(|e| read_error(e, User::KIND))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, record: User) -> Result<User, StoreError> {
        let model = user_active_model(record.clone(), false)
            .insert(&self.conn)
            .await
            .map_err(|e| write_error(e, &record, "insert"))?;
        Ok(model.into())
    }

    async fn update(&self, record: User) -> Result<(), StoreError> {
        user_active_model(record.clone(), true)
            .update(&self.conn)
            .await
            .map_err(|e| write_error(e, &record, "update"))?;
        Ok(())
    }

    async fn delete(&self, record: &User) -> Result<bool, StoreError> {
        let res = users::Entity::delete_by_id(record.id)
            .exec(&self.conn)
            .await
            .map_err(|e| write_error(e, record, "delete"))?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl RecordStore<Log> for SeaOrmStore {
    async fn get_all(&self) -> Result<Vec<Log>, StoreError> {
        let rows = logs::Entity::find()
            .order_by_asc(logs::Column::Id)
            .all(&self.conn)
            .await
            .map_err(|e| read_error(e, Log::KIND))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, record: Log) -> Result<Log, StoreError> {
        let model = log_active_model(record.clone(), false)
            .insert(&self.conn)
            .await
            .map_err(|e| write_error(e, &record, "insert"))?;
        Ok(model.into())
    }

    async fn update(&self, record: Log) -> Result<(), StoreError> {
        log_active_model(record.clone(), true)
            .update(&self.conn)
            .await
            .map_err(|e| write_error(e, &record, "update"))?;
        Ok(())
    }

    async fn delete(&self, record: &Log) -> Result<bool, StoreError> {
        let res = logs::Entity::delete_by_id(record.id)
            .exec(&self.conn)
            .await
            .map_err(|e| write_error(e, record, "delete"))?;
        Ok(res.rows_affected > 0)
    }
}
