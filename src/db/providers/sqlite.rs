use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use super::pool_options;
use super::registry::{DbProvider, DbProviderId};
use crate::config::DatabaseConfig;

/// Deleting a venue or artist cascades through `shows` and the genre tables,
/// which SQLite only enforces with `foreign_keys` on. The busy timeout lets
/// concurrent form posts wait for the writer instead of failing.
const SESSION_PRAGMAS: &[&str] = &["PRAGMA foreign_keys = ON", "PRAGMA busy_timeout = 5000"];

/// Single-file backend used for local runs and the integration tests.
pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        Ok(Database::connect(pool_options(cfg)).await?)
    }

    async fn post_connect(&self, db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        for pragma in SESSION_PRAGMAS {
            db.execute_unprepared(pragma)
                .await
                .with_context(|| format!("sqlite session setup failed: {pragma}"))?;
        }
        Ok(())
    }
}
