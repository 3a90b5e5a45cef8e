//! Session types

use std::fmt;

/// Logon credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub organisation: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        organisation: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            organisation: organisation.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("organisation", &self.organisation)
            .finish()
    }
}

/// What a successful logon hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Session id sent in the header of every authenticated call
    pub session_id: String,
    /// Base URL of the cluster serving this organisation
    pub cluster: String,
}

impl AuthContext {
    pub fn new(session_id: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            cluster: cluster.into().trim_end_matches('/').to_string(),
        }
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Closed,
    Open(AuthContext),
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}
