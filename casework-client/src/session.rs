//! Explicit session context
//!
//! A [`Session`] is empty until a login succeeds and is cleared on logout.
//! Capabilities are resolved locally from the user row with the same
//! resolver the server uses.

use shared::access::{Capabilities, Capability, Principal};
use shared::models::{LoginResponse, User};

use crate::{ClientError, ClientResult};

static NO_CAPABILITIES: Capabilities = Capabilities::none();

#[derive(Debug, Clone)]
struct SessionData {
    token: String,
    user: User,
    principal: Principal,
    capabilities: Capabilities,
}

/// Logged-in user, token and resolved capabilities
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Option<SessionData>,
}

impl Session {
    /// Empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a fresh login or location switch
    pub fn init(&mut self, login: LoginResponse) {
        let principal = login.user.principal();
        let capabilities = Capabilities::resolve(Some(&principal));
        self.inner = Some(SessionData {
            token: login.token,
            user: login.user,
            principal,
            capabilities,
        });
    }

    /// Refresh the user row (e.g. after `me`) keeping the token
    pub fn refresh_user(&mut self, user: User) {
        if let Some(data) = self.inner.as_mut() {
            data.principal = user.principal();
            data.capabilities = Capabilities::resolve(Some(&data.principal));
            data.user = user;
        }
    }

    pub fn clear(&mut self) {
        self.inner = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.inner.as_ref().map(|d| d.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.inner.as_ref().map(|d| &d.user)
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.inner.as_ref().map(|d| &d.principal)
    }

    /// Capabilities of the logged-in user; nothing when logged out
    pub fn capabilities(&self) -> &Capabilities {
        self.inner
            .as_ref()
            .map_or(&NO_CAPABILITIES, |d| &d.capabilities)
    }

    pub fn require_login(&self) -> ClientResult<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ClientError::NotLoggedIn)
        }
    }

    /// Local capability check before issuing a call
    pub fn require(&self, capability: Capability) -> ClientResult<()> {
        self.require_login()?;
        if self.capabilities().has(capability) {
            return Ok(());
        }
        Err(ClientError::Forbidden(format!(
            "Missing capability: {capability}"
        )))
    }

    /// Local record-level check before issuing a call
    pub fn ensure(&self, allowed: bool, action: &str) -> ClientResult<()> {
        self.require_login()?;
        if allowed {
            return Ok(());
        }
        Err(ClientError::Forbidden(format!("Not allowed to {action}")))
    }
}
