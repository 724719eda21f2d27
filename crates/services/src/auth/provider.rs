use std::sync::{Arc, Mutex};

use aim_core::model::{Session, User};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{AuthState, IdentityBackend};
use crate::error::AuthError;

/// Owns the current identity state and publishes it to subscribers.
///
/// Starts in the loading state. `bootstrap` resolves it; `start` forwards
/// sessions pushed by the backend until `shutdown`.
pub struct AuthProvider {
    backend: Arc<dyn IdentityBackend>,
    state: Arc<watch::Sender<AuthState>>,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

/// A live view of `AuthState`. Dropping it unsubscribes.
pub struct AuthSubscription {
    receiver: watch::Receiver<AuthState>,
}

impl AuthSubscription {
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next state change. Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

impl AuthProvider {
    #[must_use]
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        let (state, _) = watch::channel(AuthState::loading(backend.is_simulated()));
        Self {
            backend,
            state: Arc::new(state),
            forwarder: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.backend.is_simulated()
    }

    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.state.subscribe(),
        }
    }

    /// Resolve the initial identity. Errors leave the user signed out.
    pub async fn bootstrap(&self) {
        let session = match self.backend.restore_session().await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "could not restore session");
                None
            }
        };
        if let Some(session) = &session {
            info!(user_id = %session.user.id, simulated = self.is_simulated(), "signed in");
        }
        self.publish(session);
    }

    /// Begin forwarding backend session changes. Must run inside a tokio
    /// runtime; calling it twice replaces the previous forwarder.
    pub fn start(&self) {
        let mut changes = self.backend.session_changes();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let session = changes.borrow_and_update().clone();
                state.send_modify(|current| {
                    current.session = session;
                    current.loading = false;
                });
            }
        });
        if let Ok(mut slot) = self.forwarder.lock() {
            if let Some(previous) = slot.replace(handle) {
                previous.abort();
            }
        }
    }

    /// Stop forwarding backend changes.
    pub fn shutdown(&self) {
        if let Some(handle) = self.forwarder.lock().ok().and_then(|mut slot| slot.take()) {
            handle.abort();
        }
    }

    /// Request a sign-in email. In simulated mode this reloads the demo
    /// session instead.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the address is invalid or the request fails.
    pub async fn send_magic_link(&self, email: &str) -> Result<(), AuthError> {
        if self.is_simulated() {
            self.reload().await;
            return Ok(());
        }
        self.backend.send_magic_link(email).await.inspect_err(|err| {
            warn!(error = %err, "magic link request failed");
        })
    }

    /// # Errors
    ///
    /// Returns `AuthError` if the code is empty or rejected.
    pub async fn verify_email_code(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let session = self
            .backend
            .verify_email_code(email, code)
            .await
            .inspect_err(|err| warn!(error = %err, "code verification failed"))?;
        self.publish(Some(session));
        Ok(())
    }

    /// Drop the session. In simulated mode the state then reloads from
    /// scratch, which signs the demo learner back in.
    pub async fn sign_out(&self) {
        let session = self.session();
        if let Err(err) = self.backend.sign_out(session.as_ref()).await {
            warn!(error = %err, "sign-out failed");
        }
        if self.is_simulated() {
            self.reload().await;
        } else {
            self.publish(None);
        }
    }

    async fn reload(&self) {
        self.state
            .send_replace(AuthState::loading(self.backend.is_simulated()));
        self.bootstrap().await;
    }

    fn publish(&self, session: Option<Session>) {
        self.state.send_modify(|current| {
            current.session = session;
            current.loading = false;
        });
    }
}

impl Drop for AuthProvider {
    fn drop(&mut self) {
        self.shutdown();
    }
}
