//! Typed client over an [`HttpClient`] transport

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use shared::models::{
    CurrentBedAssignment, LoginRequest, LoginResponse, MeResponse, SwitchLocationRequest,
};

use crate::{ClientConfig, ClientError, ClientResult, HttpClient, NetworkHttpClient, Session};

/// Shown when a check-in or assignment targets a case that already
/// holds a bed
pub const ACTIVE_BED_WARNING: &str =
    "This case already has an active bed assignment. Check the client out before assigning a new bed.";

/// API client with an explicit session
///
/// Endpoint wrappers live in [`crate::api`], one module per resource.
pub struct CaseworkClient<H: HttpClient> {
    pub(crate) http: H,
    session: Session,
    timezone: Tz,
}

impl CaseworkClient<NetworkHttpClient> {
    /// Network client for `config`, dates in the configured time zone
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(config.build_http_client()?).with_timezone(config.timezone))
    }
}

impl<H: HttpClient> CaseworkClient<H> {
    /// Client over `http`; dates default to UTC
    pub fn new(http: H) -> Self {
        Self {
            http,
            session: Session::new(),
            timezone: Tz::UTC,
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Calendar date of `instant` in the user's time zone
    ///
    /// Form dates go out as `yyyy-MM-dd`; build them with this rather
    /// than from the UTC date.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        shared::util::local_date(instant, self.timezone)
    }

    /// Today in the user's time zone
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// Log in and initialise the session
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<&Session> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post("api/auth/login", &request).await?;
        tracing::info!(user_id = response.user.id, "Logged in");
        self.start(response);
        Ok(&self.session)
    }

    /// Drop the session and the transport token
    pub fn logout(&mut self) {
        self.session.clear();
        self.http.set_token(None);
    }

    /// Reload the current user and re-resolve capabilities
    pub async fn me(&mut self) -> ClientResult<MeResponse> {
        self.session.require_login()?;
        let me: MeResponse = self.http.get("api/auth/me").await?;
        self.session.refresh_user(me.user.clone());
        Ok(me)
    }

    /// Switch the active location; `None` returns to agency-wide scope
    pub async fn switch_location(&mut self, location_id: Option<i64>) -> ClientResult<&Session> {
        self.session.require_login()?;
        let body = SwitchLocationRequest { location_id };
        let response: LoginResponse = self.http.post("api/auth/location", &body).await?;
        self.start(response);
        Ok(&self.session)
    }

    fn start(&mut self, response: LoginResponse) {
        self.http.set_token(Some(response.token.clone()));
        self.session.init(response);
    }

    /// Refuse to place a case that already holds a bed
    ///
    /// Uses `current` when the caller already fetched it, otherwise asks
    /// the server.
    pub(crate) async fn guard_no_active_bed(
        &self,
        case_id: i64,
        current: Option<&CurrentBedAssignment>,
    ) -> ClientResult<()> {
        let has_bed = match current {
            Some(current) => current.has_allocated_bed,
            None => {
                self.fetch_current_bed_assignment(case_id)
                    .await?
                    .has_allocated_bed
            }
        };
        if has_bed {
            tracing::warn!(case_id, "Blocked: case already has an active bed");
            return Err(ClientError::Blocked(ACTIVE_BED_WARNING.to_string()));
        }
        Ok(())
    }
}
