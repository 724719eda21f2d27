use std::time::Duration;

use aim_core::model::{Session, User, UserId};
use async_trait::async_trait;
use tokio::sync::watch;

use super::{IdentityBackend, validate_email};
use crate::error::AuthError;

pub const SIMULATED_TOKEN: &str = "mock-token";

/// The demo learner used when no identity service is configured.
#[must_use]
pub fn simulated_user() -> User {
    User::new(
        UserId::new("mock-user-123"),
        Some("alex.design@example.com".into()),
        Some("Alex Johnson".into()),
    )
}

/// Stand-in backend: always signs in the demo learner after a short delay.
pub struct SimulatedIdentity {
    delay: Duration,
    changes: watch::Sender<Option<Session>>,
}

impl SimulatedIdentity {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (changes, _) = watch::channel(None);
        Self { delay, changes }
    }

    fn session() -> Session {
        Session::new(simulated_user(), SIMULATED_TOKEN)
    }
}

#[async_trait]
impl IdentityBackend for SimulatedIdentity {
    fn is_simulated(&self) -> bool {
        true
    }

    async fn restore_session(&self) -> Result<Option<Session>, AuthError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Some(Self::session()))
    }

    async fn send_magic_link(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email).map(|_| ())
    }

    async fn verify_email_code(&self, _email: &str, _code: &str) -> Result<Session, AuthError> {
        Ok(Self::session())
    }

    async fn sign_out(&self, _session: Option<&Session>) -> Result<(), AuthError> {
        Ok(())
    }

    // Never pushes; the provider reloads the demo session itself.
    fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.changes.subscribe()
    }
}
