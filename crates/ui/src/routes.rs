use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{
    CourseDetailsView, CoursesView, DashboardView, MainLayout, NotFoundView, PlayerLayout,
    PlayerView, RequireSession, SettingsView,
};

#[derive(Clone, Debug, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(AuthGate)]
        #[layout(PlayerLayout)]
            #[route("/course/:course_id", PlayerView)] Player { course_id: String },
        #[end_layout]
        #[layout(MainLayout)]
            #[route("/", DashboardView)] Dashboard {},
            #[route("/courses", CoursesView)] Courses {},
            #[route("/settings", SettingsView)] Settings {},
            #[route("/course-details/:course_id", CourseDetailsView)] CourseDetails { course_id: String },
            #[route("/:..segments", NotFoundView)] NotFound { segments: Vec<String> },
}

#[component]
fn AuthGate() -> Element {
    rsx! {
        RequireSession { Outlet::<Route> {} }
    }
}
