//! Error types raised while mapping and uploading sessions.
use serde_json::Value;
use thiserror::Error;

/// Errors raised when the exporter configuration is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("stat.ink API key must be 43 characters (got {len})")]
    ApiKeyLength { len: usize },
    #[error("stat.ink API key contains an invalid character {found:?}")]
    ApiKeyCharacter { found: char },
    #[error("no stat.ink API key configured")]
    MissingApiKey,
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    Endpoint { endpoint: String, reason: String },
}

/// A session whose shape cannot be expressed in the stat.ink schema.
///
/// These are never retried: the same record will fail the same way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("unknown lobby for mode {mode}")]
    UnknownLobby { mode: String },
    #[error("unknown rule {rule}")]
    UnknownRule { rule: String },
    #[error("unknown stage {stage}")]
    UnknownStage { stage: String },
    #[error("unknown ability {name}")]
    UnknownAbility { name: String },
    #[error("unknown salmon weapon {name}")]
    UnknownWeapon { name: String },
    #[error("unknown special weapon {name}")]
    UnknownSpecial { name: String },
    #[error("player marked as myself not found in own team")]
    SelfNotFound,
    #[error("battle has no opposing teams")]
    NoOpponents,
    #[error("malformed identifier {id:?}")]
    MalformedId { id: String },
}

/// Non-success reply from stat.ink.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("stat.ink replied {status} for {url}{}", embedded(.body.as_ref()))]
pub struct ApiError {
    pub url: String,
    pub status: u16,
    pub raw: String,
    pub body: Option<Value>,
}

fn embedded(body: Option<&Value>) -> String {
    body.and_then(|body| body.get("error"))
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

/// Boxed error produced by a [`crate::transport::Transport`] implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can stop a single session from being exported.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),
    #[error("failed to encode post body: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

impl ExportError {
    /// Whether the failure comes from the record itself rather than the service.
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_error_display_includes_embedded_error() {
        let err = ApiError {
            url: "https://stat.ink/api/v3/battle".to_string(),
            status: 400,
            raw: String::new(),
            body: Some(json!({ "error": { "lobby": ["invalid"] } })),
        };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("lobby"));
    }

    #[test]
    fn api_error_display_without_body_is_plain() {
        let err = ApiError {
            url: "https://stat.ink/api/v3/salmon".to_string(),
            status: 503,
            raw: "Service Unavailable".to_string(),
            body: None,
        };
        assert_eq!(
            err.to_string(),
            "stat.ink replied 503 for https://stat.ink/api/v3/salmon"
        );
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn mapping_errors_are_flagged() {
        let err = ExportError::from(MappingError::NoOpponents);
        assert!(err.is_mapping());
        assert_eq!(err.to_string(), "battle has no opposing teams");
    }
}
