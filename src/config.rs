//! Tap configuration
//!
//! Loaded from a JSON file (or inline JSON) and validated before anything
//! talks to the remote, so a malformed `start_date` fails the run up front.

use crate::error::{Error, Result};
use crate::http::{SoapConfig, DEFAULT_LOGIN_URL};
use crate::period::YearMonth;
use crate::session::Credentials;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Configuration file as written by the user; every key optional so missing
/// ones can be reported by name
#[derive(Debug, Default, Deserialize)]
struct RawTapConfig {
    username: Option<String>,
    password: Option<String>,
    organisation: Option<String>,
    office: Option<String>,
    start_date: Option<String>,
    login_url: Option<String>,
    timeout_seconds: Option<u64>,
}

/// Validated tap configuration
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TapConfig {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub organisation: String,
    /// Company the session switches to after logon
    pub office: String,
    /// First month to extract when a stream has no bookmark
    pub start_date: YearMonth,
    pub login_url: String,
    pub timeout_seconds: u64,
}

impl TapConfig {
    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate inline JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawTapConfig = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::validate(raw)
    }

    fn validate(raw: RawTapConfig) -> Result<Self> {
        let start_date = required(raw.start_date, "start_date")?;
        let timeout_seconds = raw.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        if timeout_seconds == 0 {
            return Err(Error::invalid_value("timeout_seconds", "must be greater than 0"));
        }

        let login_url = raw
            .login_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string());
        url::Url::parse(&login_url)
            .map_err(|e| Error::invalid_value("login_url", e.to_string()))?;

        Ok(Self {
            username: required(raw.username, "username")?,
            password: required_secret(raw.password, "password")?,
            organisation: required(raw.organisation, "organisation")?,
            office: required(raw.office, "office")?,
            start_date: YearMonth::parse_start(&start_date)?,
            login_url,
            timeout_seconds,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password, &self.organisation)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Transport settings derived from this config
    pub fn soap_config(&self) -> SoapConfig {
        SoapConfig::builder()
            .login_url(&self.login_url)
            .timeout(self.timeout())
            .build()
    }
}

impl fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("organisation", &self.organisation)
            .field("office", &self.office)
            .field("start_date", &self.start_date)
            .field("login_url", &self.login_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::missing_field(field))
}

/// Like `required`, but keeps surrounding whitespace
fn required_secret(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::missing_field(field))
}
