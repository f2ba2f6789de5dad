//! Database layer
//!
//! SQLite through sqlx. Repositories are free functions over a pool or an
//! open transaction.

pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::auth::hash_password;
use crate::core::{BootstrapAdmin, Result, ServerError};
use repository::{agency, user};
use shared::access::Role;

pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (creating if needed) the database file and run migrations
    pub async fn new(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Wait on write contention instead of failing immediately
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        tracing::info!(path = %db_path, "Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database, used by tests
    ///
    /// One connection only: each `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("./migrations").run(pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Create the first Network Administrator and its agency
    ///
    /// No-op once any user exists.
    pub async fn seed_bootstrap_admin(&self, bootstrap: &BootstrapAdmin) -> Result<()> {
        let existing = user::count(&self.pool).await?;
        if existing > 0 {
            return Ok(());
        }

        let password_hash = hash_password(&bootstrap.password)
            .map_err(|e| ServerError::Config(format!("cannot hash bootstrap password: {e}")))?;

        let agency = agency::create(&self.pool, &bootstrap.agency_name, None).await?;

        let admin = user::create(
            &self.pool,
            user::NewUser {
                username: &bootstrap.username,
                display_name: &bootstrap.username,
                password_hash: &password_hash,
                property_role: Role::NetworkAdministrator.as_str(),
                company_id: agency.id,
                active_location: None,
            },
        )
        .await?;

        tracing::info!(
            user_id = admin.id,
            username = %admin.username,
            agency_id = agency.id,
            "Bootstrap Network Administrator created"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bootstrap() -> BootstrapAdmin {
        BootstrapAdmin {
            username: "root".into(),
            password: "change-me-now".into(),
            agency_name: "Network".into(),
        }
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_once() {
        let db = DbService::in_memory().await.unwrap();
        db.seed_bootstrap_admin(&bootstrap()).await.unwrap();
        db.seed_bootstrap_admin(&bootstrap()).await.unwrap();

        assert_eq!(user::count(&db.pool).await.unwrap(), 1);
        let (admin, _) = user::find_by_username_with_hash(&db.pool, "root")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.property_role, "Network Administrator");
        assert!(admin.is_active);
    }

    #[tokio::test]
    async fn test_file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casework.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
