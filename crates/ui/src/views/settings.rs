use dioxus::prelude::*;
use services::BackendMode;

use crate::context::AppContext;
use crate::views::state::use_auth_state;

const NOTIFICATIONS: [&str; 3] = [
    "Email me about new courses",
    "Notify me when I complete a module",
    "Weekly progress summary",
];

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_auth_state();
    let user = state.user().cloned();
    let mut toggles = use_signal(|| [true; NOTIFICATIONS.len()]);

    let initial = user.as_ref().map_or_else(|| "?".to_owned(), |user| user.initial());
    let name = user
        .as_ref()
        .map_or("Student", |user| user.display_name())
        .to_owned();
    let email = user
        .as_ref()
        .and_then(|user| user.email.clone())
        .unwrap_or_default();
    let mode = match ctx.mode() {
        BackendMode::Remote => "Synced with your account",
        BackendMode::Local => "Stored on this device (mock data)",
    };

    rsx! {
        div { class: "page settings",
            h1 { "Account Settings" }

            div { class: "profile-card",
                span { class: "avatar large", "{initial}" }
                div {
                    h2 { "{name}" }
                    p { class: "muted", "{email}" }
                    if state.simulated {
                        span { class: "mock-badge", "Demo User" }
                    }
                }
            }

            section {
                h3 { "Profile Information" }
                label { "Full Name" }
                input { r#type: "text", disabled: true, value: "{name}" }
                label { "Email Address" }
                input { r#type: "email", disabled: true, value: "{email}" }
                label { "Progress" }
                p { class: "muted", "{mode}" }
            }

            hr {}

            section {
                h3 { "Notifications" }
                for (idx, label) in NOTIFICATIONS.iter().enumerate() {
                    div { key: "{idx}", class: "toggle-row",
                        span { "{label}" }
                        input {
                            r#type: "checkbox",
                            id: "toggle-{idx}",
                            checked: toggles()[idx],
                            onchange: move |_| toggles.with_mut(|flags| flags[idx] = !flags[idx]),
                        }
                    }
                }
            }
        }
    }
}
