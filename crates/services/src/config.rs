use std::env;
use std::path::PathBuf;
use std::time::Duration;

use storage::remote::RemoteConfig;
use tracing::{info, warn};

use crate::tutor::GeminiConfig;

pub const DEFAULT_DB_URL: &str = "sqlite://aim.sqlite3";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(500);

pub const HALF_REMOTE_WARNING: &str =
    "backend url and anon key must both be set; using local mode";

/// Where progress is persisted and who issues identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Hosted backend for both identity and progress.
    Remote,
    /// Local store for progress, simulated identity.
    Local,
}

impl BackendMode {
    #[must_use]
    pub fn is_simulated(self) -> bool {
        self == BackendMode::Local
    }
}

/// Startup configuration, evaluated once.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub remote: Option<RemoteConfig>,
    pub gemini: Option<GeminiConfig>,
    pub database_url: String,
    pub log_level: String,
    pub simulated_delay: Duration,
    /// The `.env` file that was loaded, if any.
    pub env_file: Option<PathBuf>,
    /// Problems found while reading the environment, logged by `report`.
    pub warnings: Vec<&'static str>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: None,
            gemini: None,
            database_url: DEFAULT_DB_URL.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            simulated_delay: DEFAULT_SIMULATED_DELAY,
            env_file: None,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment, after loading a
    /// `.env` file when one is present.
    ///
    /// Nothing is logged here; call `report` once logging is up.
    #[must_use]
    pub fn from_env() -> Self {
        let env_file = dotenvy::dotenv().ok();
        let mut config = Self::from_lookup(|key| env::var(key).ok());
        config.env_file = env_file;
        config
    }

    /// Build configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_owned())
                .find(|value| !value.is_empty())
        };

        let url = first(&["AIM_SUPABASE_URL", "VITE_SUPABASE_URL"]);
        let anon_key = first(&["AIM_SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]);
        let mut warnings = Vec::new();
        let remote = match (url, anon_key) {
            (Some(url), Some(anon_key)) => Some(RemoteConfig::new(url, anon_key)),
            (Some(_), None) | (None, Some(_)) => {
                warnings.push(HALF_REMOTE_WARNING);
                None
            }
            (None, None) => None,
        };

        let gemini = first(&["AIM_GEMINI_API_KEY", "API_KEY"]).map(|api_key| {
            let mut config = GeminiConfig::new(api_key);
            if let Some(model) = first(&["AIM_GEMINI_MODEL"]) {
                config.model = model;
            }
            if let Some(base_url) = first(&["AIM_GEMINI_BASE_URL"]) {
                config.base_url = base_url;
            }
            config
        });

        let simulated_delay = first(&["AIM_SIMULATED_DELAY_MS"])
            .and_then(|raw| raw.parse::<u64>().ok())
            .map_or(DEFAULT_SIMULATED_DELAY, Duration::from_millis);

        Self {
            remote,
            gemini,
            database_url: first(&["AIM_DB_URL"]).unwrap_or_else(|| DEFAULT_DB_URL.to_owned()),
            log_level: first(&["AIM_LOG"]).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            simulated_delay,
            env_file: None,
            warnings,
        }
    }

    /// Log where the configuration came from and anything wrong with it.
    pub fn report(&self) {
        if let Some(path) = &self.env_file {
            info!(path = %path.display(), "loaded environment file");
        }
        for warning in &self.warnings {
            warn!("{warning}");
        }
    }

    #[must_use]
    pub fn backend_mode(&self) -> BackendMode {
        if self.remote.is_some() {
            BackendMode::Remote
        } else {
            BackendMode::Local
        }
    }

    #[must_use]
    pub fn tutor_enabled(&self) -> bool {
        self.gemini.is_some()
    }
}
