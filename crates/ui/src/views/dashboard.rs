use dioxus::prelude::*;
use dioxus_router::Link;
use services::DashboardSummary;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::state::{use_current_user, use_progress_revision};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ActiveCourseVm, ChartBarVm, CourseCardVm, DashboardVm, map_dashboard};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let user = use_current_user();
    let revision = use_progress_revision();
    let progress = ctx.progress();
    let catalog = ctx.catalog();
    let user_id = user.as_ref().map(|user| user.id.clone());

    let resource = use_resource(move || {
        let progress = progress.clone();
        let catalog = catalog.clone();
        let user_id = user_id.clone();
        let _ = revision.track();
        async move {
            let user_id = user_id.ok_or(ViewError::SignedOut)?;
            let map = progress.user_progress(&user_id).await;
            let summary = DashboardSummary::build(&catalog, &map);
            Ok::<_, ViewError>(map_dashboard(&catalog, &map, &summary))
        }
    });
    let state = view_state_from_resource(&resource);

    let first_name = user
        .as_ref()
        .map_or("Student", |user| user.first_name())
        .to_owned();

    rsx! {
        div { class: "page dashboard",
            div { class: "welcome",
                h1 { "Welcome back, {first_name}! 👋" }
                p { class: "muted", "You've made great progress this week. Keep it up!" }
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    div { class: "spinner", aria_label: "Loading" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(vm) => rsx! { DashboardBody { vm } },
            }
        }
    }
}

#[component]
fn DashboardBody(vm: DashboardVm) -> Element {
    let completed = vm.completed_courses;
    let in_progress = vm.active.len();

    rsx! {
        div { class: "stats",
            div { class: "stat",
                p { class: "stat-label", "Completed" }
                p { class: "stat-value", "{completed}" }
            }
            div { class: "stat",
                p { class: "stat-label", "In Progress" }
                p { class: "stat-value", "{in_progress}" }
            }
        }

        div { class: "dashboard-grid",
            section { class: "dashboard-main",
                div { class: "section-head",
                    h2 { "Continue Learning" }
                    Link { to: Route::Courses {}, "View All" }
                }
                if in_progress == 0 {
                    p { class: "empty", "No active courses. Start one below!" }
                } else {
                    for course in vm.active {
                        ActiveCourseRow { key: "{course.id}", course }
                    }
                }

                h2 { "Explore New Courses" }
                div { class: "card-grid",
                    for card in vm.explore {
                        ExploreCard { key: "{card.id}", card }
                    }
                }
            }

            aside { class: "dashboard-side",
                h3 { "Learning Activity" }
                div { class: "chart",
                    for bar in vm.chart {
                        ChartBar { key: "{bar.label}", bar }
                    }
                }
            }
        }
    }
}

#[component]
fn ActiveCourseRow(course: ActiveCourseVm) -> Element {
    rsx! {
        div { class: "active-course",
            img { src: "{course.thumbnail}", alt: "{course.title}" }
            div { class: "active-course-body",
                h3 { "{course.title}" }
                div { class: "progress-row",
                    div { class: "progress-track",
                        div { class: "progress-fill", style: "width: {course.percentage}%" }
                    }
                    span { "{course.percentage}%" }
                }
            }
            Link {
                class: "play",
                to: Route::Player { course_id: course.id.clone() },
                "Resume"
            }
        }
    }
}

#[component]
fn ExploreCard(card: CourseCardVm) -> Element {
    rsx! {
        div { class: "course-card",
            div { class: "thumb",
                img { src: "{card.thumbnail}", alt: "{card.title}" }
                span { class: "level", "{card.level}" }
            }
            div { class: "course-card-body",
                h3 { "{card.title}" }
                p { class: "muted", "{card.description}" }
                div { class: "course-card-foot",
                    span { "{card.module_count} Modules" }
                    Link { to: Route::CourseDetails { course_id: card.id.clone() }, "Details →" }
                }
            }
        }
    }
}

#[component]
fn ChartBar(bar: ChartBarVm) -> Element {
    let class = if bar.highlighted { "bar highlighted" } else { "bar" };
    rsx! {
        div { class: "chart-column", title: "{bar.percentage}%",
            div { class: "chart-slot",
                div { class: "{class}", style: "height: {bar.percentage}%" }
            }
            span { class: "chart-label", "{bar.label}" }
        }
    }
}
