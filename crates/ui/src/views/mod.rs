mod auth;
mod course_details;
mod courses;
mod dashboard;
mod layout;
mod not_found;
mod player;
mod settings;
mod state;
mod tutor;

pub use auth::{AuthView, RequireSession};
pub use course_details::CourseDetailsView;
pub use courses::CoursesView;
pub use dashboard::DashboardView;
pub use layout::{MainLayout, PlayerLayout};
pub use not_found::NotFoundView;
pub use player::PlayerView;
pub use settings::SettingsView;
pub use state::{
    AuthSignal, ProgressRevision, ViewError, ViewState, use_auth_state, use_current_user,
    use_progress_revision, use_shared_state, view_state_from_resource,
};
pub use tutor::TutorOverlay;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
