use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracing::warn;

use services::{ApiError, ChatRole, ChatThread};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::LevelBar;
use crate::vm::{AuthState, force_sign_out};

/// AI tutor conversation, scoped to the activity the learner came from.
/// The lesson screen parks a seeded `ChatThread` in the shared slot before
/// navigating here; arriving without one bounces back to the lessons list.
#[component]
pub fn ChatView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<Option<AuthState>>>();
    let thread = use_context::<Signal<Option<ChatThread>>>();
    let navigator = use_navigator();

    let mut input = use_signal(String::new);
    let mut notice = use_signal(|| None::<&'static str>);

    use_effect(move || {
        if thread.read().is_none() {
            navigator.replace(Route::Lessons {});
        }
    });

    let backend = ctx.backend();
    let auth_service = ctx.auth_service();
    let on_send = use_callback(move |()| {
        let mut thread = thread;
        // submit() drops blank input and refuses a second in-flight turn.
        let submitted = {
            let mut guard = thread.write();
            guard.as_mut().and_then(|thread| thread.submit(&input()))
        };
        let Some(message) = submitted else {
            return;
        };
        input.set(String::new);

        let backend = backend.clone();
        let auth_service = auth_service.clone();
        let mut notice = notice;
        spawn(async move {
            let credential = auth.read().as_ref().and_then(AuthState::credential);
            let turn = {
                let guard = thread.read();
                guard
                    .as_ref()
                    .map(|thread| (thread.context().clone(), thread.lesson_title().to_owned()))
            };
            let (Some(credential), Some((context, lesson_title))) = (credential, turn) else {
                if let Some(thread) = thread.write().as_mut() {
                    thread.fail_reply();
                }
                return;
            };

            let result = backend
                .chat_turn(&credential, &message, &context, &lesson_title)
                .await;
            match result {
                Ok(reply) => {
                    if let Some(thread) = thread.write().as_mut() {
                        thread.accept_reply(reply);
                    }
                    notice.set(None);
                }
                Err(ApiError::Unauthorized) => {
                    if let Some(thread) = thread.write().as_mut() {
                        thread.fail_reply();
                    }
                    force_sign_out(auth, &auth_service).await;
                    navigator.replace(Route::Login {});
                }
                Err(err) => {
                    warn!(error = %err, "tutor reply failed");
                    if let Some(thread) = thread.write().as_mut() {
                        thread.fail_reply();
                    }
                    notice.set(Some("The tutor didn't answer. Please try again."));
                }
            }
        });
    });

    let thread_guard = thread.read();
    let lesson_title = thread_guard
        .as_ref()
        .map(|thread| thread.lesson_title().to_owned())
        .unwrap_or_default();
    let messages: Vec<(ChatRole, String)> = thread_guard
        .as_ref()
        .map(|thread| {
            thread
                .messages()
                .iter()
                .map(|message| (message.role, message.content.clone()))
                .collect()
        })
        .unwrap_or_default();
    let responding = thread_guard
        .as_ref()
        .is_some_and(ChatThread::is_responding);
    drop(thread_guard);

    rsx! {
        div { class: "page",
            LevelBar {}
            h2 { class: "page__title", "AI Tutor: {lesson_title}" }
            div { class: "chat-log",
                for (index, (role, content)) in messages.into_iter().enumerate() {
                    ChatBubble { key: "{index}", role, content }
                }
            }
            if responding {
                p { class: "page__hint", "..." }
            }
            if let Some(message) = notice() {
                p { class: "notice notice--error", "{message}" }
            }
            div { class: "chat-input-row",
                input {
                    class: "chat-input",
                    r#type: "text",
                    placeholder: "Type a message...",
                    value: "{input}",
                    oninput: move |evt| input.set(evt.value()),
                    onkeydown: move |evt| {
                        if evt.key() == Key::Enter {
                            on_send.call(());
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    disabled: responding,
                    onclick: move |_| on_send.call(()),
                    "Send"
                }
            }
            button {
                class: "btn btn-secondary",
                onclick: move |_| {
                    navigator.go_back();
                },
                "Back to Lesson"
            }
        }
    }
}

#[component]
fn ChatBubble(role: ChatRole, content: String) -> Element {
    let class = match role {
        ChatRole::Learner => "chat-bubble chat-bubble--learner",
        ChatRole::Tutor => "chat-bubble chat-bubble--tutor",
    };

    rsx! {
        div { class: "{class}", "{content}" }
    }
}
