use aim_core::model::{CourseFilter, ProgressMap};
use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::state::{use_current_user, use_progress_revision};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CourseCardVm, map_course_cards};

#[component]
pub fn CoursesView() -> Element {
    let ctx = use_context::<AppContext>();
    let user = use_current_user();
    let revision = use_progress_revision();
    let progress = ctx.progress();
    let catalog = ctx.catalog();

    let mut filter = use_signal(CourseFilter::default);
    let mut search = use_signal(String::new);

    let resource = use_resource(move || {
        let progress = progress.clone();
        let user_id = user.as_ref().map(|user| user.id.clone());
        let _ = revision.track();
        async move {
            let user_id = user_id.ok_or(ViewError::SignedOut)?;
            Ok::<ProgressMap, ViewError>(progress.user_progress(&user_id).await)
        }
    });

    let cards = match view_state_from_resource(&resource) {
        ViewState::Ready(map) => {
            let matching = filter().apply(catalog.courses(), &map, &search());
            ViewState::Ready(map_course_cards(&matching, &map))
        }
        ViewState::Idle => ViewState::Idle,
        ViewState::Loading => ViewState::Loading,
        ViewState::Error(err) => ViewState::Error(err),
    };

    rsx! {
        div { class: "page courses",
            div { class: "courses-head",
                h1 { "My Courses" }
                div { class: "courses-tools",
                    input {
                        class: "search",
                        r#type: "text",
                        placeholder: "Search courses...",
                        value: "{search}",
                        oninput: move |evt: FormEvent| search.set(evt.value()),
                    }
                    div { class: "filter-tabs",
                        for option in CourseFilter::ALL {
                            button {
                                key: "{option.label()}",
                                class: tab_class(filter() == option),
                                onclick: move |_| filter.set(option),
                                "{option.label()}"
                            }
                        }
                    }
                }
            }

            match cards {
                ViewState::Idle | ViewState::Loading => rsx! {
                    div { class: "spinner", aria_label: "Loading" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(cards) if cards.is_empty() => rsx! {
                    div { class: "empty",
                        p { "No courses found matching your criteria." }
                        button {
                            class: "link",
                            onclick: move |_| {
                                filter.set(CourseFilter::All);
                                search.set(String::new());
                            },
                            "Clear filters"
                        }
                    }
                },
                ViewState::Ready(cards) => rsx! {
                    div { class: "card-grid",
                        for card in cards {
                            CourseCard { key: "{card.id}", card }
                        }
                    }
                },
            }
        }
    }
}

fn tab_class(selected: bool) -> &'static str {
    if selected { "tab selected" } else { "tab" }
}

#[component]
fn CourseCard(card: CourseCardVm) -> Element {
    let started = card.is_started();
    rsx! {
        div { class: "course-card",
            div { class: "thumb",
                img { src: "{card.thumbnail}", alt: "{card.title}" }
                span { class: "level", "{card.level}" }
                if started {
                    div { class: "progress-track thin",
                        div { class: "progress-fill", style: "width: {card.percentage}%" }
                    }
                }
            }
            div { class: "course-card-body",
                h3 { "{card.title}" }
                p { class: "muted", "{card.description}" }
                div { class: "course-card-foot",
                    span { "{card.module_count} Modules" }
                    if started {
                        Link { class: "continue", to: Route::Player { course_id: card.id.clone() }, "Continue" }
                    } else {
                        Link { to: Route::CourseDetails { course_id: card.id.clone() }, "Details →" }
                    }
                }
            }
        }
    }
}
