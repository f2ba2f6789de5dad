//! Shared server state

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{BackgroundTasks, Config, Result};
use crate::db::DbService;
use crate::services::scheduled_checkout;

/// State handed to every handler
///
/// Cloning is cheap: the pool and JWT service are reference counted.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database, run migrations and seed the bootstrap admin
    pub async fn initialize(config: &Config) -> Result<Self> {
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::new(&config.database_path).await?;
        if let Some(bootstrap) = &config.bootstrap {
            db.seed_bootstrap_admin(bootstrap).await?;
        }

        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// State over an already migrated pool
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Today in the business time zone
    pub fn today(&self) -> NaiveDate {
        shared::util::today_in(self.config.timezone)
    }

    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        scheduled_checkout::register(&mut tasks, self);
        tasks.log_summary();
        tasks
    }
}
