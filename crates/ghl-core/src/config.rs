//! Process-wide connection settings
//!
//! Two values are mandatory: the bearer token and the location (tenant) ID.
//! The base URL is optional and defaults to the public LeadConnector host.

use std::fmt;

use crate::{Error, Result};

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://services.leadconnectorhq.com";

/// Value of the `Version` header sent with every request
pub const API_VERSION: &str = "2021-07-28";

/// Environment variable holding the bearer token
pub const ACCESS_TOKEN_VAR: &str = "GHL_ACCESS_TOKEN";

/// Environment variable holding the location ID
pub const LOCATION_ID_VAR: &str = "GHL_LOCATION_ID";

/// Environment variable overriding the base URL
pub const BASE_URL_VAR: &str = "GHL_API_BASE_URL";

/// Validated connection settings. Read-only once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub access_token: String,
    pub location_id: String,
    pub base_url: String,
}

impl Config {
    /// Build a configuration from optional parts.
    ///
    /// Blank values count as absent. The token is checked before the
    /// location ID, so a process missing both reports the token.
    pub fn new(
        access_token: Option<String>,
        location_id: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self> {
        let access_token =
            non_blank(access_token).ok_or(Error::MissingConfiguration(ACCESS_TOKEN_VAR))?;
        let location_id =
            non_blank(location_id).ok_or(Error::MissingConfiguration(LOCATION_ID_VAR))?;
        let base_url = non_blank(base_url)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            access_token,
            location_id,
            base_url,
        })
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::new(
            std::env::var(ACCESS_TOKEN_VAR).ok(),
            std::env::var(LOCATION_ID_VAR).ok(),
            std::env::var(BASE_URL_VAR).ok(),
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("location_id", &self.location_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
