//! Session resource

use super::transport::Transport;
use super::types::{AuthContext, Credentials, SessionState};
use crate::error::{Error, Result};
use tracing::{debug, info};

/// An authenticated session with an explicit `open`/`close` lifecycle
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    credentials: Credentials,
    state: SessionState,
}

impl<T: Transport> Session<T> {
    /// Create a closed session
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            state: SessionState::Closed,
        }
    }

    /// Log on. Opening an already open session is a no-op.
    pub async fn open(&mut self) -> Result<()> {
        if self.state.is_open() {
            return Ok(());
        }

        let auth = self.transport.logon(&self.credentials).await?;
        info!(
            "Logged in as '{}' on organisation '{}'",
            self.credentials.username, self.credentials.organisation
        );
        debug!("Session served by cluster {}", auth.cluster);
        self.state = SessionState::Open(auth);
        Ok(())
    }

    /// End the session. The session is closed afterwards even if the remote call fails.
    pub async fn close(&mut self) -> Result<()> {
        match std::mem::take(&mut self.state) {
            SessionState::Open(auth) => {
                self.transport.abandon(&auth).await?;
                info!("Logged out");
                Ok(())
            }
            SessionState::Closed => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The current auth context, or `NotAuthenticated` naming `operation`
    pub fn auth(&self, operation: &str) -> Result<&AuthContext> {
        match &self.state {
            SessionState::Open(auth) => Ok(auth),
            SessionState::Closed => Err(Error::not_authenticated(operation)),
        }
    }

    /// Switch to another company
    pub async fn select_company(&self, company: &str) -> Result<()> {
        let auth = self.auth("switch company")?;
        self.transport.select_company(auth, company).await?;
        info!("Switched to company: {company}");
        Ok(())
    }

    /// Run an XML request and return the raw XML response
    pub async fn execute(&self, request: &str) -> Result<String> {
        let auth = self.auth("execute a query")?;
        debug!("Executing query ({} bytes)", request.len());
        self.transport.process_xml(auth, request).await
    }
}
