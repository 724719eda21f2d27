//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by identity backends and `AuthProvider`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("verification code is empty")]
    EmptyCode,
    #[error("identity service returned {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("identity service response was malformed: {0}")]
    Malformed(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Short text suitable for the sign-in screen.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidEmail => "Please enter a valid email address.",
            AuthError::EmptyCode => "Please enter the code from your email.",
            AuthError::HttpStatus { status, .. } if (400..500).contains(status) => {
                "That didn't work. Check your details and try again."
            }
            _ => "We couldn't reach the sign-in service. Please try again.",
        }
    }
}

/// Errors emitted by tutor transports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("AI tutor is not configured")]
    Disabled,
    #[error("AI tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
