//! Error types for feature resolution
//!
//! Resolution itself never fails from the caller's point of view; these
//! types exist so that the reason a resolver came back empty stays
//! inspectable in logs and tests.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by a text-completion collaborator
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion API returned no choices")]
    EmptyResponse,

    #[error("Failed to decode completion response: {0}")]
    Decode(String),
}

/// Failure to turn completion text into a structured intent
#[derive(Error, Debug)]
pub enum IntentParseError {
    /// Neither the whole text nor any brace-delimited substring is JSON
    #[error("No JSON object found in completion text")]
    NoJsonFound,

    /// JSON was found but does not have the intent shape
    #[error("Intent JSON has an invalid shape: {0}")]
    InvalidSchema(#[source] serde_json::Error),
}

/// Reasons a resolver attempt failed (as opposed to finding nothing)
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Completion call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Completion call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(#[from] IntentParseError),

    #[error("Resolver panicked")]
    Panicked,
}

/// Errors while loading the feature catalog file
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_error_display() {
        let err = ResolverError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Completion call timed out after 1.5s");

        let err: ResolverError = IntentParseError::NoJsonFound.into();
        assert!(err.to_string().contains("No JSON object found"));

        let err: ResolverError = LlmError::Status {
            status: 503,
            body: "busy".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Completion call failed: Completion API returned status 503: busy"
        );
    }
}
