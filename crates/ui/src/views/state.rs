use aim_core::model::User;
use dioxus::prelude::*;
use services::AuthState;

use crate::context::AppContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    SignedOut,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::SignedOut => "Please sign in to continue.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

//
// ─── SHARED SIGNALS ───────────────────────────────────────────────────────────
//

/// Latest identity state, mirrored from the auth provider.
#[derive(Clone, Copy)]
pub struct AuthSignal(Signal<AuthState>);

impl AuthSignal {
    #[must_use]
    pub fn get(&self) -> AuthState {
        (self.0)()
    }
}

/// Incremented after each stored completion so progress-backed views reload.
#[derive(Clone, Copy)]
pub struct ProgressRevision(Signal<u64>);

impl ProgressRevision {
    /// Read the revision, subscribing the caller to changes.
    #[must_use]
    pub fn track(&self) -> u64 {
        (self.0)()
    }

    pub fn bump(&mut self) {
        *self.0.write() += 1;
    }
}

/// Provide `AuthSignal` and `ProgressRevision` to the subtree and keep the
/// auth signal in sync until the component unmounts.
pub fn use_shared_state(ctx: &AppContext) {
    let auth = ctx.auth();
    let initial = auth.state();
    let auth_signal = use_context_provider(|| AuthSignal(Signal::new(initial)));
    use_context_provider(|| ProgressRevision(Signal::new(0)));

    use_future(move || {
        let auth = auth.clone();
        let AuthSignal(mut state) = auth_signal;
        async move {
            let mut subscription = auth.subscribe();
            state.set(subscription.current());
            while let Some(next) = subscription.changed().await {
                state.set(next);
            }
        }
    });
}

#[must_use]
pub fn use_auth_state() -> AuthState {
    use_context::<AuthSignal>().get()
}

/// The signed-in learner. `None` only outside the auth gate.
#[must_use]
pub fn use_current_user() -> Option<User> {
    use_auth_state().user().cloned()
}

#[must_use]
pub fn use_progress_revision() -> ProgressRevision {
    use_context::<ProgressRevision>()
}
