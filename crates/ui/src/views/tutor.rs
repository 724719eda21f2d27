use dioxus::prelude::*;
use services::TutorConversation;

use crate::context::AppContext;
use crate::vm::{ChatMessageVm, CitationVm, map_chat_messages};

/// Floating AI tutor chat scoped to `context`, the title of what the
/// learner is looking at.
#[component]
pub fn TutorOverlay(context: String, #[props(default)] initially_open: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let clock = ctx.clock();
    let tutor = ctx.tutor();

    let mut open = use_signal(|| initially_open);
    let mut input = use_signal(String::new);
    let mut conversation = {
        let context = context.clone();
        use_signal(move || TutorConversation::new(context, clock.now()))
    };

    use_effect(use_reactive((&context,), move |(context,)| {
        if conversation.peek().context() != context {
            conversation.write().set_context(&context, clock.now());
        }
    }));

    let send = use_callback(move |()| {
        let text = input();
        let Some(turn) = conversation.write().begin_user_turn(&text, clock.now()) else {
            return;
        };
        input.set(String::new());
        let tutor = tutor.clone();
        let mut conversation = conversation;
        spawn(async move {
            let reply = tutor
                .respond_message(&turn.history, &turn.context, &turn.message)
                .await;
            conversation.write().finish_turn(reply);
        });
    });

    let (messages, pending) = {
        let current = conversation.read();
        (map_chat_messages(current.messages()), current.is_pending())
    };
    let can_send = !pending && !input().trim().is_empty();

    rsx! {
        div { class: "tutor",
            if open() {
                div { class: "tutor-window",
                    div { class: "tutor-head",
                        h3 { "Aim AI Tutor" }
                        button {
                            class: "icon",
                            aria_label: "Close tutor",
                            onclick: move |_| open.set(false),
                            "×"
                        }
                    }

                    div { class: "tutor-messages",
                        for message in messages {
                            TutorMessage { key: "{message.id}", message }
                        }
                        if pending {
                            div { class: "tutor-thinking", "Thinking..." }
                        }
                    }

                    div { class: "tutor-input",
                        input {
                            r#type: "text",
                            placeholder: "Ask about this topic...",
                            value: "{input}",
                            oninput: move |evt: FormEvent| input.set(evt.value()),
                            onkeydown: move |evt: KeyboardEvent| {
                                if evt.key() == Key::Enter && !evt.modifiers().contains(Modifiers::SHIFT) {
                                    evt.prevent_default();
                                    send.call(());
                                }
                            },
                        }
                        button {
                            class: "primary",
                            aria_label: "Send",
                            disabled: !can_send,
                            onclick: move |_| send.call(()),
                            "Send"
                        }
                    }
                }
            } else {
                button {
                    class: "tutor-toggle",
                    aria_label: "Ask Aim AI",
                    onclick: move |_| open.set(true),
                    "Ask Aim AI"
                }
            }
        }
    }
}

#[component]
fn TutorMessage(message: ChatMessageVm) -> Element {
    let class = if message.is_user {
        "bubble from-user"
    } else {
        "bubble from-tutor"
    };

    rsx! {
        div { class: "tutor-message",
            div { class: "{class}",
                p { "{message.text}" }
                span { class: "time", "{message.time}" }
            }
            if !message.citations.is_empty() {
                div { class: "citations",
                    for (idx, citation) in message.citations.into_iter().enumerate() {
                        CitationLink { key: "{idx}", citation }
                    }
                }
            }
        }
    }
}

#[component]
fn CitationLink(citation: CitationVm) -> Element {
    let ctx = use_context::<AppContext>();
    let opener = ctx.link_opener();
    let uri = citation.uri.clone();
    let icon = if citation.is_map { "📍" } else { "🌐" };

    rsx! {
        button {
            class: "citation",
            title: "{citation.uri}",
            onclick: move |_| opener.open_url(&uri),
            span { class: "citation-icon", "{icon}" }
            div {
                p { class: "citation-title", "{citation.title}" }
                p { class: "citation-action", "{citation.action}" }
            }
        }
    }
}
