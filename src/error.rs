use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Issue {0} not found. Please check the issue key.")]
    NotFound(String),

    #[error("Authentication failed. Please check your Jira token.")]
    AuthFailure,

    #[error("Permission denied. You don't have permission to edit issue {0}.")]
    PermissionDenied(String),

    #[error("Request failed: {0}")]
    RequestFailure(String),

    #[error("{0}")]
    ToolMissing(String),

    #[error("AI command timed out after {after:?}. Try with shorter context.")]
    Timeout { after: Duration },

    #[error("AI command failed: {0}")]
    ExecutionFailure(String),

    #[error("AI command returned an empty response")]
    EmptyResponse,

    #[error("Required section \"{0}\" cannot be empty")]
    MissingRequiredSection(String),

    #[error("No valid content provided for any section")]
    EmptyTemplate,

    #[error("No content provided for any section")]
    NoContentProvided,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User cancelled operation")]
    Cancelled,

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl From<inquire::error::InquireError> for Error {
    fn from(err: inquire::error::InquireError) -> Self {
        match err {
            inquire::error::InquireError::OperationCanceled => Error::Cancelled,
            inquire::error::InquireError::OperationInterrupted => Error::Cancelled,
            other => Error::Prompt(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RequestFailure(err.to_string())
    }
}

impl Error {
    /// Whether this error came from the AI command layer
    pub fn is_ai_failure(&self) -> bool {
        matches!(
            self,
            Error::ToolMissing(_)
                | Error::Timeout { .. }
                | Error::ExecutionFailure(_)
                | Error::EmptyResponse
        )
    }

    /// Process exit status for an error that escaped the session
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Cancelled => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_contains_key() {
        let err = Error::NotFound("PROJ-42".to_string());
        assert!(err.to_string().contains("PROJ-42"));
    }

    #[test]
    fn test_ai_failures_are_classified() {
        assert!(Error::EmptyResponse.is_ai_failure());
        assert!(Error::Timeout {
            after: Duration::from_secs(5)
        }
        .is_ai_failure());
        assert!(!Error::AuthFailure.is_ai_failure());
    }

    #[test]
    fn test_timeout_message_keeps_subsecond_precision() {
        let err = Error::Timeout {
            after: Duration::from_millis(200),
        };
        assert!(err.to_string().contains("200ms"));

        let err = Error::Timeout {
            after: Duration::from_secs(60),
        };
        assert!(err.to_string().contains("60s"));
    }

    #[test]
    fn test_cancelled_exit_code() {
        assert_eq!(Error::Cancelled.exit_code(), 130);
        assert_eq!(Error::EmptyTemplate.exit_code(), 1);
    }

    #[test]
    fn test_inquire_interrupt_maps_to_cancelled() {
        let err: Error = inquire::error::InquireError::OperationInterrupted.into();
        assert!(matches!(err, Error::Cancelled));
    }
}
