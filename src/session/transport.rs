//! Transport seam

use super::types::{AuthContext, Credentials};
use crate::error::Result;
use async_trait::async_trait;

/// Wire-level operations of the remote session protocol.
///
/// Implementations report failures as they happen; none of them retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Authenticate and learn the session id and cluster
    async fn logon(&self, credentials: &Credentials) -> Result<AuthContext>;

    /// Switch the session to another company (office)
    async fn select_company(&self, auth: &AuthContext, company: &str) -> Result<()>;

    /// Run an XML request on the cluster and return the XML response
    async fn process_xml(&self, auth: &AuthContext, request: &str) -> Result<String>;

    /// End the session on the remote side
    async fn abandon(&self, auth: &AuthContext) -> Result<()>;
}
