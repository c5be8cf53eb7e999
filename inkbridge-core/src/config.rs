//! Exporter configuration.
use serde::{Deserialize, Serialize};

use crate::constants::{API_KEY_LEN, DEFAULT_ENDPOINT, DEFAULT_UPLOAD_MODE};
use crate::error::ConfigError;

/// A stat.ink API key that has passed format validation.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate a raw key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not exactly 43 URL-safe characters.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let key = raw.trim();
        let len = key.chars().count();
        if len != API_KEY_LEN {
            return Err(ConfigError::ApiKeyLength { len });
        }
        if let Some(found) = key
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_')))
        {
            return Err(ConfigError::ApiKeyCharacter { found });
        }
        Ok(Self(key.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Settings the exporter is constructed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "ExporterConfig::default_upload_mode")]
    pub upload_mode: String,
    #[serde(default = "ExporterConfig::default_endpoint")]
    pub endpoint: String,
}

impl ExporterConfig {
    fn default_upload_mode() -> String {
        DEFAULT_UPLOAD_MODE.to_string()
    }

    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    /// Parse a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The validated API key.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is configured or it is malformed.
    pub fn api_key(&self) -> Result<ApiKey, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)
            .and_then(ApiKey::parse)
    }

    /// Endpoint without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an http(s) URL.
    pub fn endpoint(&self) -> Result<String, ConfigError> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
            Ok(endpoint.to_string())
        } else {
            Err(ConfigError::Endpoint {
                endpoint: self.endpoint.clone(),
                reason: "expected an http(s) URL".to_string(),
            })
        }
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            upload_mode: Self::default_upload_mode(),
            endpoint: Self::default_endpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJ0123456";

    #[test]
    fn api_key_requires_43_characters() {
        assert!(ApiKey::parse(KEY).is_ok());
        assert_eq!(
            ApiKey::parse("short"),
            Err(ConfigError::ApiKeyLength { len: 5 })
        );
        let bad = format!("{}!", &KEY[..42]);
        assert_eq!(
            ApiKey::parse(&bad),
            Err(ConfigError::ApiKeyCharacter { found: '!' })
        );
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::parse(KEY).unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg = ExporterConfig::from_json(&format!(r#"{{ "api_key": "{KEY}" }}"#)).unwrap();
        assert_eq!(cfg.upload_mode, "Manual");
        assert_eq!(cfg.endpoint().unwrap(), "https://stat.ink");
        assert!(cfg.api_key().is_ok());
        assert_eq!(
            ExporterConfig::default().api_key(),
            Err(ConfigError::MissingApiKey)
        );
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let cfg = ExporterConfig {
            endpoint: "http://localhost:8080/".to_string(),
            ..ExporterConfig::default()
        };
        assert_eq!(cfg.endpoint().unwrap(), "http://localhost:8080");
        let bad = ExporterConfig {
            endpoint: "stat.ink".to_string(),
            ..ExporterConfig::default()
        };
        assert!(bad.endpoint().is_err());
    }
}
