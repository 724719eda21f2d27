use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use aim_core::model::{ProgressRecord, Session, UserId};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("remote store returned {status}: {message}")]
    Remote { status: u16, message: String },
}

/// Repository contract for module completions.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Persist one completion.
    ///
    /// Recording the same (user, course, module) triple twice must leave a
    /// single logical completion behind.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the completion cannot be stored.
    async fn record_completion(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Every completion recorded for a user, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be read or decoded.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, StorageError>;
}

/// Persistence for the signed-in session across launches.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if a stored session exists but cannot be read.
    async fn load_session(&self) -> Result<Option<Session>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be written.
    async fn save_session(&self, session: &Session) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the stored session cannot be removed.
    async fn clear_session(&self) -> Result<(), StorageError>;
}

/// Supplies the bearer token for requests made on behalf of the signed-in
/// learner. `None` means nobody is signed in.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Option<String>;
}

/// Reads the token straight from a `SessionStore`, without any refresh.
pub struct StoredSessionToken(pub Arc<dyn SessionStore>);

#[async_trait]
impl TokenSource for StoredSessionToken {
    async fn access_token(&self) -> Option<String> {
        match self.0.load_session().await {
            Ok(session) => session.map(|session| session.access_token),
            Err(err) => {
                debug!(error = %err, "stored session unreadable");
                None
            }
        }
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<UserId, Vec<ProgressRecord>>>>,
    session: Arc<Mutex<Option<Session>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn record_completion(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        let records = guard.entry(record.user_id.clone()).or_default();
        if !records.iter().any(|existing| existing.same_completion(record)) {
            records.push(record.clone());
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard.get(user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SessionStore for InMemoryRepository {
    async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        let guard = self.session.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let mut guard = self.session.lock().map_err(poisoned)?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut guard = self.session.lock().map_err(poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates progress and session stores behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionStore> = Arc::new(repo);
        Self { progress, sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::model::{CourseId, ModuleId, User};
    use aim_core::time::fixed_now;

    fn record(user: &str, module: &str) -> ProgressRecord {
        ProgressRecord::new(
            UserId::new(user),
            CourseId::new("c1"),
            ModuleId::new(module),
            fixed_now(),
        )
    }

    #[tokio::test]
    async fn repeated_completion_is_stored_once() {
        let repo = InMemoryRepository::new();
        repo.record_completion(&record("u1", "m1-1")).await.unwrap();
        repo.record_completion(&record("u1", "m1-1")).await.unwrap();
        repo.record_completion(&record("u1", "m1-2")).await.unwrap();

        let records = repo.list_for_user(&UserId::new("u1")).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(repo.list_for_user(&UserId::new("u2")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_round_trips_and_clears() {
        let storage = Storage::in_memory();
        assert!(storage.sessions.load_session().await.unwrap().is_none());

        let user = User::new(UserId::new("u1"), Some("a@b.c".into()), None);
        storage
            .sessions
            .save_session(&Session::new(user, "tok"))
            .await
            .unwrap();
        let loaded = storage.sessions.load_session().await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "tok");

        storage.sessions.clear_session().await.unwrap();
        assert!(storage.sessions.load_session().await.unwrap().is_none());
    }
}
