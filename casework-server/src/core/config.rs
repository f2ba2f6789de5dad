use chrono_tz::Tz;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};
use crate::utils::time::parse_timezone;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory |
/// | DATABASE_PATH | {WORK_DIR}/casework.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | TIMEZONE | UTC | business time zone for "today" |
/// | JWT_SECRET | random in development | signing secret, at least 32 chars |
/// | JWT_EXPIRATION_MINUTES | 480 | token lifetime |
/// | JWT_ISSUER | casework-server | token issuer |
/// | JWT_AUDIENCE | casework-clients | token audience |
/// | SCHEDULED_CHECKOUT_INTERVAL_SECS | 300 | finalizer period |
/// | LOG_LEVEL | info | tracing filter when RUST_LOG is unset |
/// | LOG_DIR | unset | enables daily rolling log files |
/// | BOOTSTRAP_ADMIN_USERNAME | unset | first-run Network Administrator |
/// | BOOTSTRAP_ADMIN_PASSWORD | unset | its password |
/// | BOOTSTRAP_AGENCY_NAME | Network | its agency |
///
/// ```ignore
/// WORK_DIR=/srv/casework HTTP_PORT=8080 TIMEZONE=America/Chicago casework-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub timezone: Tz,
    pub jwt: JwtConfig,
    pub scheduled_checkout_interval_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Seeded only when the user table is empty
    pub bootstrap: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub agency_name: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let parsed = |name: &str, default: u64| -> Result<u64> {
            match var(name) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ServerError::Config(format!("{name} must be a number, got {v:?}"))),
                None => Ok(default),
            }
        };

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let work_dir = var("WORK_DIR").unwrap_or_else(|| "./data".into());
        let database_path =
            var("DATABASE_PATH").unwrap_or_else(|| format!("{work_dir}/casework.db"));

        let http_port = u16::try_from(parsed("HTTP_PORT", 3000)?)
            .map_err(|_| ServerError::Config("HTTP_PORT out of range".into()))?;

        let timezone = match var("TIMEZONE") {
            Some(name) => parse_timezone(&name)
                .ok_or_else(|| ServerError::Config(format!("unknown TIMEZONE {name:?}")))?,
            None => chrono_tz::UTC,
        };

        let jwt = JwtConfig {
            secret: Self::require_secret(var("JWT_SECRET"), &environment)?,
            expiration_minutes: parsed("JWT_EXPIRATION_MINUTES", 480)? as i64,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| "casework-server".into()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| "casework-clients".into()),
        };

        let bootstrap = match (var("BOOTSTRAP_ADMIN_USERNAME"), var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(BootstrapAdmin {
                username,
                password,
                agency_name: var("BOOTSTRAP_AGENCY_NAME").unwrap_or_else(|| "Network".into()),
            }),
            (Some(_), None) => {
                return Err(ServerError::Config(
                    "BOOTSTRAP_ADMIN_PASSWORD must be set with BOOTSTRAP_ADMIN_USERNAME".into(),
                ));
            }
            _ => None,
        };

        Ok(Self {
            work_dir,
            database_path,
            http_port,
            environment,
            timezone,
            jwt,
            scheduled_checkout_interval_secs: parsed("SCHEDULED_CHECKOUT_INTERVAL_SECS", 300)?.max(1),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
            bootstrap,
        })
    }

    /// Secret must be set and at least 32 characters outside development;
    /// development falls back to a random per-process secret
    fn require_secret(value: Option<String>, environment: &str) -> Result<String> {
        match value {
            Some(secret) if secret.len() >= 32 => Ok(secret),
            Some(_) => Err(ServerError::Config(
                "JWT_SECRET must be at least 32 characters long".into(),
            )),
            None if environment == "development" => {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                Ok(crate::auth::generate_printable_secret())
            }
            None => Err(ServerError::Config(format!(
                "JWT_SECRET must be set in {environment} environment"
            ))),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
