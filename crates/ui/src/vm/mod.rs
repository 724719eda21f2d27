mod chat_vm;
mod course_vm;
mod dashboard_vm;
mod markdown_vm;
mod player_vm;
mod time_fmt;

pub use chat_vm::{ChatMessageVm, CitationVm, map_chat_messages};
pub use course_vm::{CourseCardVm, CourseDetailVm, CurriculumRowVm, map_course_cards};
pub use dashboard_vm::{ActiveCourseVm, ChartBarVm, DashboardVm, map_dashboard};
pub use markdown_vm::{markdown_to_html, normalize_markdown, sanitize_html};
pub use player_vm::{ActiveModuleVm, ModuleContentVm, ModuleRowVm, PlayerVm, build_player_vm};
pub use time_fmt::{format_count, format_message_time, format_minutes};
