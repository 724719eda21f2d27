mod chat;
mod course;
mod ids;
mod module;
mod progress;
mod user;

pub use ids::{CourseId, IdParseError, ModuleId, UserId};

pub use chat::{ChatMessage, ChatRole, GroundingLink, GroundingSource};
pub use course::{Course, CourseError, CourseLevel};
pub use module::{Module, ModuleError, ModuleKind};
pub use progress::{
    CourseFilter, CourseStatus, ProgressMap, ProgressRecord, completed_modules,
    completion_percentage,
};
pub use user::{Session, User};
