use dioxus::prelude::*;
use dioxus_router::{Link, Outlet};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::state::{use_auth_state, use_current_user};

/// Sidebar plus header around the routed page.
#[component]
pub fn MainLayout() -> Element {
    rsx! {
        div { class: "shell",
            Sidebar {}
            div { class: "shell-main",
                header { class: "topbar",
                    h2 { class: "topbar-title", "Student Portal" }
                    UserBadge {}
                }
                main { class: "content",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

/// Header-only frame that leaves the player the full width.
#[component]
pub fn PlayerLayout() -> Element {
    rsx! {
        div { class: "shell shell-player",
            header { class: "topbar",
                Brand {}
                UserBadge {}
            }
            Outlet::<Route> {}
        }
    }
}

#[component]
fn Brand() -> Element {
    rsx! {
        Link { class: "brand", to: Route::Dashboard {},
            span { class: "brand-mark", "A" }
            span { class: "brand-name", "Aim AI" }
        }
    }
}

#[component]
fn UserBadge() -> Element {
    let user = use_current_user();
    let (name, initial) = user.as_ref().map_or_else(
        || ("Student".to_owned(), "?".to_owned()),
        |user| (user.display_name().to_owned(), user.initial()),
    );

    rsx! {
        div { class: "user-badge",
            span { class: "user-name", "{name}" }
            span { class: "avatar", "{initial}" }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let simulated = use_auth_state().simulated;
    let auth = ctx.auth();

    let on_sign_out = move |_: MouseEvent| {
        let auth = auth.clone();
        spawn(async move {
            auth.sign_out().await;
        });
    };

    rsx! {
        nav { class: "sidebar",
            Brand {}
            ul { class: "nav",
                li { Link { to: Route::Dashboard {}, active_class: "active", "Dashboard" } }
                li { Link { to: Route::Courses {}, active_class: "active", "My Courses" } }
                li { Link { to: Route::Settings {}, active_class: "active", "Settings" } }
            }
            div { class: "sidebar-footer",
                if simulated {
                    div { class: "mock-badge", "Using Mock Data" }
                }
                button { class: "sign-out", onclick: on_sign_out, "Sign Out" }
            }
        }
    }
}
