//! Supabase (PostgREST) backed progress store.

use std::sync::Arc;

use crate::repository::{ProgressRepository, SessionStore, Storage, TokenSource};

mod progress_repo;

pub use progress_repo::RemoteProgressRepository;

/// Project URL and public anon key of the hosted backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
}

impl RemoteConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// `{url}/{path}` with exactly one slash between them.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Storage {
    /// Progress goes to the remote table and the session stays in
    /// `sessions`. Each request asks `tokens` for its bearer token.
    #[must_use]
    pub fn remote(
        config: RemoteConfig,
        sessions: Arc<dyn SessionStore>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let progress: Arc<dyn ProgressRepository> =
            Arc::new(RemoteProgressRepository::new(config, tokens));
        Self { progress, sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = RemoteConfig::new("https://proj.supabase.co/", "anon");
        assert_eq!(
            config.endpoint("/rest/v1/user_progress"),
            "https://proj.supabase.co/rest/v1/user_progress"
        );
    }
}
