//! Repositories
//!
//! Free functions over `&SqlitePool`. Bed workflow writes run inside one
//! `BEGIN IMMEDIATE` transaction each.

pub mod agency;
pub mod bed_assignment;
pub mod case;
pub mod site;
pub mod user;

use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

use shared::bed::InvalidTransition;
use shared::error::{AppError, ErrorCode};

use crate::core::ServerError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation carrying its own error code
    #[error("{0}")]
    Rejected(AppError),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::Validation("referenced record does not exist".to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<AppError> for RepoError {
    fn from(err: AppError) -> Self {
        RepoError::Rejected(err)
    }
}

impl From<InvalidTransition> for RepoError {
    fn from(err: InvalidTransition) -> Self {
        RepoError::Rejected(err.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => {
                AppError::with_message(ErrorCode::NotFound, format!("{what} not found"))
            }
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Rejected(err) => err,
        }
    }
}

impl From<RepoError> for ServerError {
    fn from(err: RepoError) -> Self {
        ServerError::Database(err.to_string())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Start a write transaction that takes the database write lock up front
pub(crate) async fn begin_immediate(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Seed helpers for repository tests

    use chrono::NaiveDate;
    use sqlx::SqlitePool;

    use shared::models::{Agency, Bed, BedCreate, Case, CaseCreate, Site, SiteCreate, User};

    use super::{agency, case, site, user};
    use crate::db::DbService;

    pub struct Fixture {
        pub pool: SqlitePool,
        pub agency: Agency,
        pub admin: User,
        pub site: Site,
        pub beds: Vec<Bed>,
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub async fn fixture() -> Fixture {
        let pool = DbService::in_memory().await.unwrap().pool;
        seed(pool).await
    }

    /// Same seed data on an existing pool, e.g. a file database
    pub async fn seed(pool: SqlitePool) -> Fixture {
        let agency = agency::create(&pool, "Harbor House", None).await.unwrap();
        let admin = user::create(
            &pool,
            user::NewUser {
                username: "admin",
                display_name: "Admin",
                password_hash: "x",
                property_role: "Agency Administrator",
                company_id: agency.id,
                active_location: None,
            },
        )
        .await
        .unwrap();
        let site = site::create_site(
            &pool,
            agency.id,
            &SiteCreate {
                name: "North Shelter".into(),
                address: None,
                agency_id: None,
                location_id: None,
            },
        )
        .await
        .unwrap();

        let mut beds = Vec::new();
        for name in ["A1", "A2"] {
            let bed = site::create_bed(
                &pool,
                site.id,
                &BedCreate {
                    name: name.into(),
                    room_name: Some("Room A".into()),
                    bed_type: Some("Single".into()),
                },
            )
            .await
            .unwrap();
            beds.push(bed);
        }

        Fixture {
            pool,
            agency,
            admin,
            site,
            beds,
        }
    }

    impl Fixture {
        pub async fn case(&self, first_name: &str) -> Case {
            case::create(
                &self.pool,
                self.agency.id,
                self.admin.id,
                &CaseCreate {
                    first_name: first_name.into(),
                    last_name: "Client".into(),
                    date_of_birth: None,
                    agency_id: None,
                    location_id: None,
                },
            )
            .await
            .unwrap()
        }
    }
}
