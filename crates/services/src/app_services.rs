use std::sync::Arc;

use storage::repository::{Storage, TokenSource};
use tracing::info;

use crate::auth::{AuthProvider, IdentityBackend, SimulatedIdentity, SupabaseIdentity};
use crate::config::{AppConfig, BackendMode};
use crate::error::AppServicesError;
use crate::progress::ProgressService;
use crate::tutor::{GeminiTransport, TutorService, TutorTransport};
use crate::{Catalog, Clock};

/// Assembles app-facing services for the selected backend mode.
#[derive(Clone)]
pub struct AppServices {
    mode: BackendMode,
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthProvider>,
    tutor: Arc<TutorService>,
    clock: Clock,
}

impl AppServices {
    /// Build services from startup configuration.
    ///
    /// The local store always holds the session; progress goes to the remote
    /// table when a backend is configured and to the local store otherwise.
    /// Remote requests take their token from the identity backend, which
    /// refreshes it as it nears expiry.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the local store cannot be opened.
    pub async fn from_config(config: &AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let local = Storage::sqlite(&config.database_url).await?;
        let mode = config.backend_mode();

        let (storage, backend) = match &config.remote {
            Some(remote) => {
                let identity = Arc::new(SupabaseIdentity::new(
                    remote.clone(),
                    Arc::clone(&local.sessions),
                    clock,
                ));
                let tokens: Arc<dyn TokenSource> = identity.clone();
                let backend: Arc<dyn IdentityBackend> = identity;
                (
                    Storage::remote(remote.clone(), Arc::clone(&local.sessions), tokens),
                    backend,
                )
            }
            None => {
                let identity: Arc<dyn IdentityBackend> =
                    Arc::new(SimulatedIdentity::new(config.simulated_delay));
                (local, identity)
            }
        };

        let transport = config
            .gemini
            .clone()
            .map(|gemini| Arc::new(GeminiTransport::new(gemini)) as Arc<dyn TutorTransport>);

        info!(
            ?mode,
            tutor = transport.is_some(),
            database = %config.database_url,
            "services configured"
        );

        Ok(Self::new(
            mode,
            Arc::new(Catalog::builtin()),
            &storage,
            backend,
            transport,
            clock,
        ))
    }

    /// Wire services from explicit parts.
    #[must_use]
    pub fn new(
        mode: BackendMode,
        catalog: Arc<Catalog>,
        storage: &Storage,
        identity: Arc<dyn IdentityBackend>,
        transport: Option<Arc<dyn TutorTransport>>,
        clock: Clock,
    ) -> Self {
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.progress),
        ));
        Self {
            mode,
            catalog,
            progress,
            auth: Arc::new(AuthProvider::new(identity)),
            tutor: Arc::new(TutorService::new(clock, transport)),
            clock,
        }
    }

    /// In-memory storage, simulated identity with no delay, tutor disabled.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(
            BackendMode::Local,
            Arc::new(Catalog::builtin()),
            &Storage::in_memory(),
            Arc::new(SimulatedIdentity::new(std::time::Duration::ZERO)),
            None,
            clock,
        )
    }

    #[must_use]
    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthProvider> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }
}
