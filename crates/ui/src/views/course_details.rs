use aim_core::model::CourseId;
use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{CourseDetailVm, CurriculumRowVm};

#[component]
pub fn CourseDetailsView(course_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let Some(course) = catalog.course(&CourseId::new(course_id)) else {
        return rsx! { CourseNotFound {} };
    };
    let vm = CourseDetailVm::from(course);
    let module_count = vm.curriculum.len();

    rsx! {
        div { class: "page course-details",
            section { class: "hero",
                img { class: "hero-image", src: "{vm.thumbnail}", alt: "{vm.title}" }
                div { class: "hero-body",
                    Link { class: "back", to: Route::Dashboard {}, "← Back to Dashboard" }
                    h1 { "{vm.title}" }
                    p { "{vm.description}" }
                    ul { class: "hero-facts",
                        li { "{vm.total_duration} Total Duration" }
                        li { "{vm.students} Students" }
                        li { "{vm.level} Level" }
                    }
                }
            }

            div { class: "details-grid",
                div { class: "details-main",
                    section { class: "curriculum",
                        div { class: "section-head",
                            h3 { "Course Content" }
                            span { class: "muted", "{module_count} Modules" }
                        }
                        for row in vm.curriculum {
                            CurriculumRow { key: "{row.number}", row }
                        }
                    }

                    section { class: "instructor",
                        img {
                            class: "instructor-photo",
                            src: "https://picsum.photos/seed/{vm.instructor}/200",
                            alt: "{vm.instructor}",
                        }
                        h3 { "{vm.instructor}" }
                        p { class: "muted", "Instructor" }
                    }
                }

                aside { class: "enroll",
                    Link {
                        class: "primary",
                        to: Route::Player { course_id: vm.id.clone() },
                        "Start Learning Now"
                    }
                }
            }
        }
    }
}

#[component]
fn CurriculumRow(row: CurriculumRowVm) -> Element {
    let lock = if row.unlocked { "▶" } else { "🔒" };
    rsx! {
        div { class: "curriculum-row",
            span { class: "number", "{row.number}" }
            div { class: "curriculum-body",
                h4 { "{row.title}" }
                span { class: "kind", "{row.kind}" }
                span { class: "muted", " • {row.duration}" }
            }
            span { class: "lock", "{lock}" }
        }
    }
}

#[component]
pub(crate) fn CourseNotFound() -> Element {
    rsx! {
        div { class: "page not-found",
            p { "Course not found" }
            Link { to: Route::Courses {}, "Browse courses" }
        }
    }
}
