use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

#[component]
pub fn NotFoundView(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    rsx! {
        div { class: "page not-found",
            h2 { "Page not found" }
            p { class: "muted", "Nothing lives at {path} yet." }
            Link { to: Route::Dashboard {}, "Back to Dashboard" }
        }
    }
}
