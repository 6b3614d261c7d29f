//! Data models and structures
//!
//! Defines the inbound/outbound JSON bodies of the caption endpoint and the
//! environment-driven service configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CAPTION_ROUTE: &str = "/caption";
pub const HEALTH_ROUTE: &str = "/health";

/// Caller payload for the caption endpoint.
///
/// The field is optional at the serde level so that an absent description and
/// an empty one are rejected by the same check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionRequest {
    #[serde(rename = "photoDescription", default)]
    pub photo_description: Option<String>,
}

impl CaptionRequest {
    /// Decode a caller body.
    ///
    /// Only a JSON object can carry `photoDescription`; arrays, strings and
    /// `null` decode to an empty request rather than filling fields by position.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        match serde_json::from_slice::<serde_json::Value>(bytes)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }

    /// Returns the description when it is present and non-empty.
    pub fn description(&self) -> Option<&str> {
        self.photo_description
            .as_deref()
            .filter(|description| !description.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Upstream credential. `Debug` is redacted so the key never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key, treating an empty value as unset.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<ApiKey>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub caption_route: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            caption_route: DEFAULT_CAPTION_ROUTE.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read configuration from the process environment.
    pub fn from_env() -> crate::Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let caption_route = lookup("CAPTION_ROUTE").unwrap_or(defaults.caption_route);
        if !caption_route.starts_with('/') {
            return Err(crate::Error::Config(format!(
                "CAPTION_ROUTE must start with '/' (got '{}')",
                caption_route
            )));
        }
        if caption_route == HEALTH_ROUTE {
            return Err(crate::Error::Config(format!(
                "CAPTION_ROUTE must not shadow {}",
                HEALTH_ROUTE
            )));
        }

        Ok(Self {
            gemini_api_key: lookup("GEMINI_API_KEY").and_then(ApiKey::new),
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|model| !model.trim().is_empty())
                .unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.gemini_base_url),
            caption_route,
        })
    }
}
