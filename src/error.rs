//! Error types for the financial node assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {

    // =============================
    // Core Errors
    // =============================

    /// Missing or unusable credential at startup. Fatal.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file missing/unreadable or the upload call failed.
    #[error("Upload error: {0}")]
    Upload(String),

    /// Upstream generation call failed (network, quota, error status).
    #[error("Generation error: {0}")]
    Generation(String),

    /// Structured reply did not conform to the node schema.
    /// Carries the raw payload for diagnosis.
    #[error("Schema parse error: {reason}\nraw payload: {raw}")]
    Parse { reason: String, raw: String },

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssistantError {
    /// Only configuration failures abort the process; everything else is
    /// reported at the command-loop boundary and the loop continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AssistantError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_raw_payload() {
        let err = AssistantError::Parse {
            reason: "missing field `node_name`".to_string(),
            raw: r#"{"oops": true}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing field `node_name`"));
        assert!(msg.contains(r#"{"oops": true}"#));
    }

    #[test]
    fn test_only_config_is_fatal() {
        assert!(AssistantError::Config("no key".into()).is_fatal());
        assert!(!AssistantError::Upload("gone".into()).is_fatal());
        assert!(!AssistantError::Generation("503".into()).is_fatal());
    }
}
