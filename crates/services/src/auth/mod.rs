//! Identity: who is signed in, and how sessions are obtained and dropped.

mod provider;
mod simulated;
mod supabase;

use aim_core::model::{Session, User};
use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::AuthError;

pub use provider::{AuthProvider, AuthSubscription};
pub use simulated::{SIMULATED_TOKEN, SimulatedIdentity, simulated_user};
pub use supabase::SupabaseIdentity;

/// Snapshot of the identity state observed by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// While true the identity is unknown; protected views must wait.
    pub loading: bool,
    pub simulated: bool,
}

impl AuthState {
    #[must_use]
    pub fn loading(simulated: bool) -> Self {
        Self {
            session: None,
            loading: true,
            simulated,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        !self.loading && self.session.is_some()
    }
}

/// A source of sessions: the hosted identity service or a local stand-in.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    fn is_simulated(&self) -> bool;

    /// Session left over from a previous launch, if still usable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the stored session cannot be read or refreshed.
    async fn restore_session(&self) -> Result<Option<Session>, AuthError>;

    /// Ask the service to email a sign-in link and one-time code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for an invalid address or a rejected request.
    async fn send_magic_link(&self, email: &str) -> Result<(), AuthError>;

    /// Exchange the emailed one-time code for a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the code is rejected.
    async fn verify_email_code(&self, email: &str, code: &str) -> Result<Session, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` if the service or local store cannot be updated.
    async fn sign_out(&self, session: Option<&Session>) -> Result<(), AuthError>;

    /// Sessions pushed by the backend whenever they change.
    fn session_changes(&self) -> watch::Receiver<Option<Session>>;
}

/// Minimal shape check before contacting the identity service.
pub(crate) fn validate_email(email: &str) -> Result<&str, AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidEmail),
    }
}
