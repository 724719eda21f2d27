use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::state::use_auth_state;

/// Renders `children` only once a learner is signed in.
#[component]
pub fn RequireSession(children: Element) -> Element {
    let state = use_auth_state();

    if state.loading {
        return rsx! {
            div { class: "splash",
                div { class: "spinner", aria_label: "Loading" }
            }
        };
    }
    if state.session.is_none() {
        return rsx! { AuthView {} };
    }
    rsx! { {children} }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AuthStep {
    Email,
    CodeSent { email: String },
}

/// Passwordless sign-in: email, then the emailed one-time code.
#[component]
pub fn AuthView() -> Element {
    let ctx = use_context::<AppContext>();
    let simulated = use_auth_state().simulated;

    let mut email = use_signal(String::new);
    let mut code = use_signal(String::new);
    let mut step = use_signal(|| AuthStep::Email);
    let busy = use_signal(|| false);
    let mut error = use_signal(|| None::<&'static str>);

    let on_send = {
        let auth = ctx.auth();
        use_callback(move |()| {
            if busy() {
                return;
            }
            let address = email().trim().to_owned();
            if address.is_empty() {
                return;
            }
            let auth = auth.clone();
            let mut busy = busy;
            let mut error = error;
            let mut step = step;
            spawn(async move {
                busy.set(true);
                error.set(None);
                match auth.send_magic_link(&address).await {
                    // Simulated sign-in already switched the gate.
                    Ok(()) if auth.is_simulated() => {}
                    Ok(()) => step.set(AuthStep::CodeSent { email: address }),
                    Err(err) => error.set(Some(err.user_message())),
                }
                busy.set(false);
            });
        })
    };

    let on_verify = {
        let auth = ctx.auth();
        use_callback(move |address: String| {
            if busy() {
                return;
            }
            let token = code().trim().to_owned();
            let auth = auth.clone();
            let mut busy = busy;
            let mut error = error;
            spawn(async move {
                busy.set(true);
                error.set(None);
                if let Err(err) = auth.verify_email_code(&address, &token).await {
                    error.set(Some(err.user_message()));
                }
                busy.set(false);
            });
        })
    };

    let submit_label = if busy() {
        "Sending..."
    } else {
        "Sign in with Magic Link"
    };

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                div { class: "brand-mark large", "A" }
                h2 { "Welcome back" }

                match step() {
                    AuthStep::Email => rsx! {
                        form {
                            class: "auth-form",
                            onsubmit: move |evt: FormEvent| {
                                evt.prevent_default();
                                on_send.call(());
                            },
                            label { r#for: "email", "Email address" }
                            input {
                                id: "email",
                                r#type: "email",
                                autocomplete: "email",
                                placeholder: "you@example.com",
                                value: "{email}",
                                oninput: move |evt: FormEvent| email.set(evt.value()),
                            }
                            button {
                                r#type: "submit",
                                class: "primary",
                                disabled: busy(),
                                "{submit_label}"
                            }
                        }
                    },
                    AuthStep::CodeSent { email: address } => {
                        let target = address.clone();
                        rsx! {
                            div { class: "auth-sent",
                                h3 { "Check your email" }
                                p {
                                    "We sent a magic link to "
                                    strong { "{address}" }
                                    ". Click the link, or enter the code from the email."
                                }
                                input {
                                    r#type: "text",
                                    inputmode: "numeric",
                                    autocomplete: "one-time-code",
                                    placeholder: "123456",
                                    value: "{code}",
                                    oninput: move |evt: FormEvent| code.set(evt.value()),
                                }
                                button {
                                    class: "primary",
                                    disabled: busy(),
                                    onclick: move |_| on_verify.call(target.clone()),
                                    "Verify code"
                                }
                                button {
                                    class: "link",
                                    onclick: move |_| {
                                        code.set(String::new());
                                        error.set(None);
                                        step.set(AuthStep::Email);
                                    },
                                    "Try another email"
                                }
                            }
                        }
                    }
                }

                if let Some(message) = error() {
                    p { class: "auth-error", role: "alert", "{message}" }
                }

                if simulated && step() == AuthStep::Email {
                    div { class: "demo-notice",
                        p {
                            strong { "Demo Mode: " }
                            "No identity service is configured. Signing in uses a mock learner."
                        }
                    }
                }
            }
        }
    }
}
