//! Error types for scale request normalization and config loading.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a scale request is rejected before it reaches the next handler.
///
/// Every variant is a client error; nothing here is retried.
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("method {0} not allowed, expected POST")]
    InvalidMethod(String),

    #[error("request has no body")]
    MissingBody,

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("failed to decode scale request: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ScaleError {
    /// HTTP status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            ScaleError::InvalidMethod(_) => 405,
            ScaleError::MissingBody | ScaleError::BodyRead(_) | ScaleError::Decode(_) => 400,
        }
    }

    /// Response body sent to the caller. Internal detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ScaleError::InvalidMethod(_) => "Only POST is allowed",
            ScaleError::MissingBody | ScaleError::BodyRead(_) => "Error reading request body",
            ScaleError::Decode(_) => "Error unmarshalling request body",
        }
    }
}

/// Errors loading or validating a `ScalingConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid scaling config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ScaleError::InvalidMethod("GET".into()).status_code(), 405);
        assert_eq!(ScaleError::MissingBody.status_code(), 400);
        assert_eq!(ScaleError::BodyRead("eof".into()).status_code(), 400);

        let decode = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        assert_eq!(ScaleError::Decode(decode).status_code(), 400);
    }

    #[test]
    fn public_messages_hide_detail() {
        let err = ScaleError::BodyRead("connection reset by peer".into());
        assert_eq!(err.public_message(), "Error reading request body");
        assert!(err.to_string().contains("connection reset"));

        assert_eq!(ScaleError::MissingBody.public_message(), "Error reading request body");
        assert_eq!(
            ScaleError::InvalidMethod("PUT".into()).public_message(),
            "Only POST is allowed"
        );
    }
}
