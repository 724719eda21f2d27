use std::collections::BTreeSet;
use std::time::Duration;

use aim_core::model::{CourseId, ModuleId, ModuleKind, completion_percentage};
use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::course_details::CourseNotFound;
use crate::views::state::{use_current_user, use_progress_revision};
use crate::views::{TutorOverlay, ViewError, ViewState, view_state_from_resource};
use crate::vm::{ActiveModuleVm, ModuleContentVm, ModuleRowVm, build_player_vm};

/// Keeps "Saving..." visible briefly so a fast local write still registers.
const MARKING_SETTLE: Duration = Duration::from_millis(500);

#[component]
pub fn PlayerView(course_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let course_id = CourseId::new(course_id);
    if catalog.course(&course_id).is_none() {
        return rsx! { CourseNotFound {} };
    }
    rsx! { CoursePlayer { key: "{course_id}", course_id } }
}

/// Claims the in-flight flag; `false` when a completion is already saving.
pub(crate) fn begin_marking(marking: &mut Signal<bool>) -> bool {
    if *marking.peek() {
        return false;
    }
    marking.set(true);
    true
}

#[component]
fn CoursePlayer(course_id: CourseId) -> Element {
    let ctx = use_context::<AppContext>();
    let user = use_current_user();
    let revision = use_progress_revision();
    let catalog = ctx.catalog();
    let progress = ctx.progress();

    let mut selected = use_signal(|| None::<ModuleId>);
    let mut sidebar_open = use_signal(|| true);
    let marking = use_signal(|| false);

    let resource = {
        let progress = progress.clone();
        let course_id = course_id.clone();
        let user_id = user.as_ref().map(|user| user.id.clone());
        use_resource(move || {
            let progress = progress.clone();
            let course_id = course_id.clone();
            let user_id = user_id.clone();
            let _ = revision.track();
            async move {
                let user_id = user_id.ok_or(ViewError::SignedOut)?;
                Ok::<_, ViewError>(progress.completed_modules(&user_id, &course_id).await)
            }
        })
    };
    let completed = match view_state_from_resource(&resource) {
        ViewState::Ready(completed) => completed,
        _ => BTreeSet::new(),
    };

    let Some(course) = catalog.course(&course_id) else {
        return rsx! { CourseNotFound {} };
    };
    let percentage = completion_percentage(completed.len(), course.module_count()).unwrap_or(0);
    let vm = build_player_vm(course, &completed, percentage, selected().as_ref());

    let on_complete = {
        let course_id = course_id.clone();
        let user_id = user.as_ref().map(|user| user.id.clone());
        let active_id = vm.active.as_ref().map(|active| ModuleId::new(active.id.clone()));
        move |_: MouseEvent| {
            let (Some(user_id), Some(module_id)) = (user_id.clone(), active_id.clone()) else {
                return;
            };
            let mut marking = marking;
            if !begin_marking(&mut marking) {
                return;
            }
            let progress = progress.clone();
            let course_id = course_id.clone();
            let mut revision = revision;
            spawn(async move {
                if progress.mark_complete(&user_id, &course_id, &module_id).await {
                    revision.bump();
                }
                tokio::time::sleep(MARKING_SETTLE).await;
                marking.set(false);
            });
        }
    };

    let previous = vm.previous.clone();
    let next = vm.next.clone();
    let sidebar_class = if sidebar_open() { "module-list" } else { "module-list collapsed" };
    let complete_label = if marking() { "Saving..." } else { "Mark as Complete" };

    rsx! {
        div { class: "player",
            aside { class: "{sidebar_class}",
                div { class: "module-list-head",
                    Link { class: "back", to: Route::Dashboard {}, "← Back to Dashboard" }
                    h2 { "{vm.course_title}" }
                    div { class: "progress-track",
                        div { class: "progress-fill", style: "width: {vm.percentage}%" }
                    }
                    p { class: "muted", "{vm.percentage}% Completed" }
                }
                for row in vm.modules {
                    ModuleRow {
                        key: "{row.id}",
                        row,
                        onselect: move |id: String| selected.set(Some(ModuleId::new(id))),
                    }
                }
            }

            div { class: "player-main",
                div { class: "player-bar",
                    button {
                        class: "icon",
                        aria_label: "Toggle module list",
                        onclick: move |_| sidebar_open.set(!sidebar_open()),
                        "☰"
                    }
                    if let Some(active) = vm.active.as_ref() {
                        span { class: "player-title", "{active.title}" }
                    }
                }

                if let Some(active) = vm.active.clone() {
                    div { class: "lesson",
                        ModuleContent { module: active }
                        div { class: "lesson-actions",
                            button {
                                class: "secondary",
                                disabled: previous.is_none(),
                                onclick: move |_| {
                                    if let Some(id) = previous.clone() {
                                        selected.set(Some(ModuleId::new(id)));
                                    }
                                },
                                "← Previous Module"
                            }
                            button {
                                class: "primary",
                                disabled: marking(),
                                onclick: on_complete,
                                "{complete_label}"
                            }
                            button {
                                class: "secondary",
                                disabled: next.is_none(),
                                onclick: move |_| {
                                    if let Some(id) = next.clone() {
                                        selected.set(Some(ModuleId::new(id)));
                                    }
                                },
                                "Next Module →"
                            }
                        }
                    }
                } else {
                    p { class: "empty", "This course has no modules yet." }
                }
            }

            TutorOverlay { context: vm.tutor_context.clone() }
        }
    }
}

#[component]
fn ModuleRow(row: ModuleRowVm, onselect: EventHandler<String>) -> Element {
    let mut class = String::from("module-row");
    if row.active {
        class.push_str(" active");
    }
    if row.completed {
        class.push_str(" completed");
    }
    let icon = match (row.completed, row.kind) {
        (true, _) => "✓",
        (false, ModuleKind::Video) => "▶",
        (false, ModuleKind::Text) => "📄",
        (false, ModuleKind::Quiz) => "?",
    };

    let id = row.id.clone();

    rsx! {
        button { class: "{class}", onclick: move |_| onselect.call(id.clone()),
            span { class: "module-icon", "{icon}" }
            div {
                p { class: "module-title", "{row.number}. {row.title}" }
                span { class: "muted", "{row.duration}" }
            }
        }
    }
}

#[component]
fn ModuleContent(module: ActiveModuleVm) -> Element {
    let ctx = use_context::<AppContext>();
    let opener = ctx.link_opener();

    match module.content {
        ModuleContentVm::Video { url } => {
            let target = url.clone();
            rsx! {
                div { class: "video-frame",
                    img { src: "{url}", alt: "Video thumbnail" }
                    button {
                        class: "video-play",
                        aria_label: "Play video",
                        onclick: move |_| opener.open_url(&target),
                        "▶"
                    }
                    span { class: "video-badge", "Mock Player" }
                }
            }
        }
        ModuleContentVm::Text { html } => rsx! {
            article { class: "lesson-text", dangerous_inner_html: "{html}" }
        },
        ModuleContentVm::Quiz { question } => rsx! {
            div { class: "quiz",
                h3 { "Quiz" }
                p { class: "quiz-question", "{question}" }
                p { class: "muted", "Think it through, then check your answer with the AI tutor." }
            }
        },
    }
}
