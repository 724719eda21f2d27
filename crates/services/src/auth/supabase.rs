use std::sync::Arc;

use aim_core::model::{Session, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use storage::remote::RemoteConfig;
use storage::repository::{SessionStore, TokenSource};
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use super::{IdentityBackend, validate_email};
use crate::Clock;
use crate::error::AuthError;

const OTP_PATH: &str = "auth/v1/otp";
const VERIFY_PATH: &str = "auth/v1/verify";
const TOKEN_PATH: &str = "auth/v1/token";
const LOGOUT_PATH: &str = "auth/v1/logout";
const MAX_ERROR_BODY: usize = 200;
/// Sessions this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Passwordless email sign-in against the hosted identity service.
///
/// Sessions are persisted through a `SessionStore` so they survive restarts,
/// and every change is pushed on `session_changes`. As a `TokenSource` it
/// hands out access tokens that are refreshed shortly before they expire.
pub struct SupabaseIdentity {
    client: Client,
    config: RemoteConfig,
    sessions: Arc<dyn SessionStore>,
    clock: Clock,
    changes: watch::Sender<Option<Session>>,
    refreshing: Mutex<()>,
}

impl SupabaseIdentity {
    #[must_use]
    pub fn new(config: RemoteConfig, sessions: Arc<dyn SessionStore>, clock: Clock) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            client: Client::new(),
            config,
            sessions,
            clock,
            changes,
            refreshing: Mutex::new(()),
        }
    }

    /// The stored session, refreshed first when it expires within a minute.
    ///
    /// A session that is past expiry and cannot be refreshed is cleared and
    /// `None` is pushed on `session_changes`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the session store cannot be read or written.
    pub async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        // One refresh at a time: refresh tokens are single-use.
        let _guard = self.refreshing.lock().await;
        let Some(session) = self.sessions.load_session().await? else {
            return Ok(None);
        };
        let now = self.clock.now();
        if !session.is_expired(now + Duration::seconds(REFRESH_MARGIN_SECS)) {
            return Ok(Some(session));
        }

        if let Some(refresh_token) = session.refresh_token.as_deref() {
            match self.refresh(refresh_token).await {
                Ok(fresh) => {
                    info!(user_id = %fresh.user.id, "session refreshed");
                    return self.adopt(fresh).await.map(Some);
                }
                Err(err) => warn!(error = %err, "session refresh failed"),
            }
        }
        if !session.is_expired(now) {
            return Ok(Some(session));
        }

        info!("stored session expired");
        self.sessions.clear_session().await?;
        self.changes.send_replace(None);
        Ok(None)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.config.endpoint(TOKEN_PATH))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.config.anon_key)
            .json(&RefreshBody { refresh_token })
            .send()
            .await?;
        let payload: SessionPayload = ensure_success(response).await?.json().await?;
        payload.into_session(self.clock.now())
    }

    async fn adopt(&self, session: Session) -> Result<Session, AuthError> {
        self.sessions.save_session(&session).await?;
        self.changes.send_replace(Some(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl IdentityBackend for SupabaseIdentity {
    fn is_simulated(&self) -> bool {
        false
    }

    async fn restore_session(&self) -> Result<Option<Session>, AuthError> {
        self.current_session().await
    }

    async fn send_magic_link(&self, email: &str) -> Result<(), AuthError> {
        let email = validate_email(email)?;
        let response = self
            .client
            .post(self.config.endpoint(OTP_PATH))
            .header("apikey", &self.config.anon_key)
            .json(&OtpBody {
                email,
                create_user: true,
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn verify_email_code(&self, email: &str, code: &str) -> Result<Session, AuthError> {
        let email = validate_email(email)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::EmptyCode);
        }

        let response = self
            .client
            .post(self.config.endpoint(VERIFY_PATH))
            .header("apikey", &self.config.anon_key)
            .json(&VerifyBody {
                kind: "email",
                email,
                token: code,
            })
            .send()
            .await?;
        let payload: SessionPayload = ensure_success(response).await?.json().await?;
        let session = payload.into_session(self.clock.now())?;
        self.adopt(session).await
    }

    async fn sign_out(&self, session: Option<&Session>) -> Result<(), AuthError> {
        if let Some(session) = session {
            let result = self
                .client
                .post(self.config.endpoint(LOGOUT_PATH))
                .header("apikey", &self.config.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;
            let outcome = match result {
                Ok(response) => ensure_success(response).await.map(|_| ()),
                Err(err) => Err(AuthError::from(err)),
            };
            if let Err(err) = outcome {
                warn!(error = %err, "remote sign-out failed, clearing local session anyway");
            }
        }
        self.sessions.clear_session().await?;
        self.changes.send_replace(None);
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.changes.subscribe()
    }
}

#[async_trait]
impl TokenSource for SupabaseIdentity {
    async fn access_token(&self) -> Option<String> {
        match self.current_session().await {
            Ok(session) => session.map(|session| session.access_token),
            Err(err) => {
                warn!(error = %err, "no usable session for request");
                None
            }
        }
    }
}

//
// ─── WIRE FORMAT ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct OtpBody<'a> {
    email: &'a str,
    create_user: bool,
}

#[derive(Debug, Serialize)]
struct VerifyBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    email: &'a str,
    token: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

impl SessionPayload {
    fn into_session(self, now: DateTime<Utc>) -> Result<Session, AuthError> {
        if self.user.id.trim().is_empty() || self.access_token.is_empty() {
            return Err(AuthError::Malformed("session without user or token".into()));
        }
        let expires_at = self
            .expires_at
            .and_then(|at| DateTime::<Utc>::from_timestamp(at, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));

        let user = User::new(
            UserId::new(self.user.id),
            self.user.email,
            self.user.user_metadata.full_name,
        );
        let mut session = Session::new(user, self.access_token);
        session.refresh_token = self.refresh_token;
        session.expires_at = expires_at;
        Ok(session)
    }
}

async fn ensure_success(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(MAX_ERROR_BODY)
        .collect();
    Err(AuthError::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::time::fixed_now;

    #[test]
    fn payload_maps_metadata_and_expiry() {
        let payload: SessionPayload = serde_json::from_str(
            r#"{"access_token":"at","refresh_token":"rt","expires_in":3600,
                "user":{"id":"u-1","email":"sam@example.com","user_metadata":{"full_name":"Sam Lee"}}}"#,
        )
        .unwrap();
        let session = payload.into_session(fixed_now()).unwrap();
        assert_eq!(session.user.id.as_str(), "u-1");
        assert_eq!(session.user.first_name(), "Sam");
        assert_eq!(session.refresh_token.as_deref(), Some("rt"));
        assert_eq!(session.expires_at, Some(fixed_now() + Duration::hours(1)));
    }

    #[test]
    fn payload_without_user_id_is_rejected() {
        let payload: SessionPayload =
            serde_json::from_str(r#"{"access_token":"at","user":{"id":" "}}"#).unwrap();
        assert!(matches!(
            payload.into_session(fixed_now()),
            Err(AuthError::Malformed(_))
        ));
    }
}
