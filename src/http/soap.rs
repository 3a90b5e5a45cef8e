//! SOAP transport over reqwest

use super::envelope::{self, SoapAction};
use crate::error::{Error, Result};
use crate::session::{AuthContext, Credentials, Transport};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SESSION_SERVICE: &str = "webservices/session.asmx";
const PROCESS_XML_SERVICE: &str = "webservices/processxml.asmx";

/// Default login cluster
pub const DEFAULT_LOGIN_URL: &str = "https://login.twinfield.com";

/// Configuration for the SOAP transport
#[derive(Debug, Clone)]
pub struct SoapConfig {
    /// Base URL of the login cluster
    pub login_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for SoapConfig {
    fn default() -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.to_string(),
            timeout: Duration::from_secs(300),
            user_agent: format!("twinfield-tap/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SoapConfig {
    /// Create a new config builder
    pub fn builder() -> SoapConfigBuilder {
        SoapConfigBuilder::default()
    }
}

/// Builder for SOAP transport config
#[derive(Default)]
pub struct SoapConfigBuilder {
    config: SoapConfig,
}

impl SoapConfigBuilder {
    /// Set the login cluster URL
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.config.login_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> SoapConfig {
        self.config
    }
}

/// [`Transport`] implementation speaking SOAP 1.1
#[derive(Debug, Clone)]
pub struct SoapTransport {
    client: Client,
    config: SoapConfig,
}

impl SoapTransport {
    /// Create a transport. Fails if the login URL is not a valid URL.
    pub fn new(config: SoapConfig) -> Result<Self> {
        Url::parse(&config.login_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SoapConfig {
        &self.config
    }

    /// Join a service path onto a base URL
    fn endpoint(base: &str, service: &str) -> Result<Url> {
        let base = Url::parse(&format!("{}/", base.trim_end_matches('/')))?;
        Ok(base.join(service)?)
    }

    /// Post an envelope and return the response body.
    ///
    /// A SOAP fault wins over the HTTP status, since faults arrive as 500s.
    async fn call(&self, url: Url, action: SoapAction, body: String) -> Result<String> {
        debug!("POST {} ({})", url, action.name());

        let response = self
            .client
            .post(url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", action.header_value())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if let Ok(Some(fault)) = envelope::find_fault(&text) {
            return Err(Error::soap_fault(fault));
        }
        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), text));
        }
        Ok(text)
    }

    /// Call an operation and return the text of its `<Action>Result` element
    async fn call_for_result(
        &self,
        url: Url,
        action: SoapAction,
        body: String,
    ) -> Result<Option<String>> {
        let text = self.call(url, action, body).await?;
        envelope::find_element_text(&text, &action.result_element())
    }
}

#[async_trait]
impl Transport for SoapTransport {
    async fn logon(&self, credentials: &Credentials) -> Result<AuthContext> {
        let url = Self::endpoint(&self.config.login_url, SESSION_SERVICE)?;
        let body = envelope::build(
            SoapAction::Logon,
            &[
                ("user", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("organisation", credentials.organisation.as_str()),
            ],
            None,
        );

        let text = self.call(url, SoapAction::Logon, body).await?;

        let result = envelope::find_element_text(&text, "LogonResult")?
            .ok_or_else(|| Error::auth("response has no LogonResult"))?;
        if result.trim() != "Ok" {
            return Err(Error::auth(format!("Logon result was '{}'", result.trim())));
        }

        let session_id = envelope::find_element_text(&text, "SessionID")?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::auth("response has no SessionID header"))?;
        let cluster = envelope::find_element_text(&text, "cluster")?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::auth("response has no cluster"))?;

        Ok(AuthContext::new(session_id, cluster))
    }

    async fn select_company(&self, auth: &AuthContext, company: &str) -> Result<()> {
        let url = Self::endpoint(&auth.cluster, SESSION_SERVICE)?;
        let body = envelope::build(
            SoapAction::SelectCompany,
            &[("company", company)],
            Some(&auth.session_id),
        );

        let result = self
            .call_for_result(url, SoapAction::SelectCompany, body)
            .await?
            .unwrap_or_default();
        if result.trim() != "Ok" {
            return Err(Error::remote(format!(
                "cannot switch to company '{company}': result was '{}'",
                result.trim()
            )));
        }
        Ok(())
    }

    async fn process_xml(&self, auth: &AuthContext, request: &str) -> Result<String> {
        let url = Self::endpoint(&auth.cluster, PROCESS_XML_SERVICE)?;
        let body = envelope::build(
            SoapAction::ProcessXmlString,
            &[("xmlRequest", request)],
            Some(&auth.session_id),
        );

        self.call_for_result(url, SoapAction::ProcessXmlString, body)
            .await?
            .ok_or_else(|| Error::xml("response has no ProcessXmlStringResult"))
    }

    async fn abandon(&self, auth: &AuthContext) -> Result<()> {
        let url = Self::endpoint(&auth.cluster, SESSION_SERVICE)?;
        let body = envelope::build(SoapAction::Abandon, &[], Some(&auth.session_id));
        self.call(url, SoapAction::Abandon, body).await?;
        Ok(())
    }
}
