use std::sync::Arc;

use aim_core::model::Session;
use aim_core::time::fixed_now;
use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::auth::SimulatedIdentity;
use services::{AppServices, AuthError, BackendMode, Catalog, Clock, IdentityBackend};
use storage::repository::Storage;
use tokio::sync::watch;

use crate::context::{AppContext, UiApp};
use crate::platform::UiLinkOpener;
use crate::routes::Route;
use crate::views::{
    CourseDetailsView, CoursesView, DashboardView, NotFoundView, PlayerView, RequireSession,
    SettingsView, TutorOverlay, use_shared_state,
};

struct IgnoreLinks;

impl UiLinkOpener for IgnoreLinks {
    fn open_url(&self, _url: &str) {}
}

/// Hosted-mode identity with nobody signed in.
#[derive(Default)]
pub struct SignedOutIdentity {
    changes: watch::Sender<Option<Session>>,
}

#[async_trait]
impl IdentityBackend for SignedOutIdentity {
    fn is_simulated(&self) -> bool {
        false
    }

    async fn restore_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(None)
    }

    async fn send_magic_link(&self, _email: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn verify_email_code(&self, _email: &str, _code: &str) -> Result<Session, AuthError> {
        Err(AuthError::EmptyCode)
    }

    async fn sign_out(&self, _session: Option<&Session>) -> Result<(), AuthError> {
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.changes.subscribe()
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    /// The real router, starting at `/`.
    App,
    Dashboard,
    Courses,
    CourseDetails(String),
    Player(String),
    Settings,
    NotFound(Vec<String>),
    Gate,
    Tutor(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| AppContext::new(&app, Arc::new(IgnoreLinks)));
    use_shared_state(&ctx);
    use_context_provider(|| props.view.clone());

    if props.view == ViewKind::App {
        return rsx! { Router::<Route> {} };
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::App => rsx! {},
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Courses => rsx! { CoursesView {} },
        ViewKind::CourseDetails(course_id) => rsx! { CourseDetailsView { course_id } },
        ViewKind::Player(course_id) => rsx! { PlayerView { course_id } },
        ViewKind::Settings => rsx! { SettingsView {} },
        ViewKind::NotFound(segments) => rsx! { NotFoundView { segments } },
        ViewKind::Gate => rsx! {
            RequireSession {
                p { "protected content" }
            }
        },
        ViewKind::Tutor(context) => rsx! { TutorOverlay { context, initially_open: true } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: Arc<AppServices>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Local services with the demo learner already signed in.
pub async fn signed_in_services() -> Arc<AppServices> {
    let services = Arc::new(AppServices::in_memory(Clock::fixed(fixed_now())));
    services.auth().bootstrap().await;
    services
}

/// Services whose identity comes from `identity`, not yet bootstrapped.
pub fn services_with_identity(identity: Arc<dyn IdentityBackend>) -> Arc<AppServices> {
    let mode = if identity.is_simulated() {
        BackendMode::Local
    } else {
        BackendMode::Remote
    };
    Arc::new(AppServices::new(
        mode,
        Arc::new(Catalog::builtin()),
        &Storage::in_memory(),
        identity,
        None,
        Clock::fixed(fixed_now()),
    ))
}

pub fn simulated_services() -> Arc<AppServices> {
    services_with_identity(Arc::new(SimulatedIdentity::new(std::time::Duration::ZERO)))
}

pub fn setup_view_harness(view: ViewKind, services: Arc<AppServices>) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::clone(&services),
            view,
        },
    );
    ViewHarness { dom, services }
}
