//! Unified error types for the fact feed
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `RestError`: PostgREST client errors
//! - `FactValidationError`: Client-side form validation failures
//! - `SubmitError` / `VoteError`: Outcomes of the submission and vote flows
//! - `ConfigError`: Environment configuration errors
//! - `AppError`: Application layer errors (what the shell reports)

use thiserror::Error;

use crate::domain::entities::{FactId, VoteKind};

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// PostgREST API client errors
#[derive(Debug, Error)]
pub enum RestError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Backend returned no rows")]
    EmptyResponse,
}

impl From<RestError> for DomainError {
    fn from(e: RestError) -> Self {
        match e {
            RestError::EmptyResponse => DomainError::NotFound(e.to_string()),
            other => DomainError::Backend(other.to_string()),
        }
    }
}

/// Why a submitted fact was rejected before reaching the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactValidationError {
    #[error("Fact text must not be empty")]
    EmptyText,

    #[error("Fact text is {len} characters, the limit is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("Source '{0}' is not a valid absolute URL")]
    InvalidSource(String),

    #[error("Source scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("Category must not be empty")]
    EmptyCategory,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Submission flow errors
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid fact: {0}")]
    Invalid(#[from] FactValidationError),

    #[error("A fact is already being uploaded")]
    Busy,

    #[error("Upload failed: {0}")]
    Backend(DomainError),
}

impl SubmitError {
    /// Whether the caller should close the submission form.
    ///
    /// Only a request that actually reached the backend ends the form's
    /// lifecycle; rejected and refused submissions keep the user's input.
    pub fn closes_form(&self) -> bool {
        matches!(self, SubmitError::Backend(_))
    }
}

/// Vote flow errors
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Fact {0} is not in the feed")]
    NotFound(FactId),

    #[error("A vote on fact {0} is already in flight")]
    Busy(FactId),

    #[error("Fact {0} cannot take another {1} vote")]
    CounterFull(FactId, VoteKind),

    #[error("Vote failed: {0}")]
    Backend(DomainError),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Application layer errors - what the shell reports to the user
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    #[error("{0}")]
    Vote(#[from] VoteError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Parse error for shell commands
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing argument for: {0}")]
    MissingArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_maps_to_not_found() {
        let err: DomainError = RestError::EmptyResponse.into();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn api_error_maps_to_backend() {
        let err: DomainError = RestError::Api {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        match err {
            DomainError::Backend(msg) => assert!(msg.contains("500")),
            other => panic!("Expected Backend error, got {:?}", other),
        }
    }

    #[test]
    fn parse_errors_surface_unchanged() {
        let err: AppError = ParseError::UnknownCommand("dance".to_string()).into();
        assert_eq!(err.to_string(), "Unknown command: dance");
    }

    #[test]
    fn only_backend_failures_close_the_form() {
        assert!(SubmitError::Backend(DomainError::Backend("down".to_string())).closes_form());
        assert!(!SubmitError::Busy.closes_form());
        assert!(!SubmitError::Invalid(FactValidationError::EmptyText).closes_form());
    }
}
