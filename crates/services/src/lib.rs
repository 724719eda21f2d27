#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod config;
pub mod error;
pub mod progress;
pub mod tutor;

pub use aim_core::{Catalog, Clock};

pub use app_services::AppServices;
pub use auth::{AuthProvider, AuthState, AuthSubscription, IdentityBackend};
pub use config::{AppConfig, BackendMode};
pub use error::{AppServicesError, AuthError, TutorError};
pub use progress::{ChartBar, CourseProgress, DashboardSummary, ProgressService};
pub use tutor::{TutorConversation, TutorReply, TutorService, TutorTransport};
