use std::sync::Arc;

use aim_core::{Catalog, Clock};
use services::{AppServices, AuthProvider, BackendMode, ProgressService, TutorService};

use crate::platform::{DesktopLinkOpener, LinkOpenerRef};

pub trait UiApp: Send + Sync {
    fn mode(&self) -> BackendMode;
    fn clock(&self) -> Clock;

    fn catalog(&self) -> Arc<Catalog>;
    fn progress(&self) -> Arc<ProgressService>;
    fn auth(&self) -> Arc<AuthProvider>;
    fn tutor(&self) -> Arc<TutorService>;
}

impl UiApp for AppServices {
    fn mode(&self) -> BackendMode {
        AppServices::mode(self)
    }

    fn clock(&self) -> Clock {
        AppServices::clock(self)
    }

    fn catalog(&self) -> Arc<Catalog> {
        AppServices::catalog(self)
    }

    fn progress(&self) -> Arc<ProgressService> {
        AppServices::progress(self)
    }

    fn auth(&self) -> Arc<AuthProvider> {
        AppServices::auth(self)
    }

    fn tutor(&self) -> Arc<TutorService> {
        AppServices::tutor(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    mode: BackendMode,
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
    auth: Arc<AuthProvider>,
    tutor: Arc<TutorService>,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>, link_opener: LinkOpenerRef) -> Self {
        Self {
            mode: app.mode(),
            clock: app.clock(),
            catalog: app.catalog(),
            progress: app.progress(),
            auth: app.auth(),
            tutor: app.tutor(),
            link_opener,
        }
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

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

/// Build an `AppContext` that opens links in the system browser.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app, Arc::new(DesktopLinkOpener))
}
