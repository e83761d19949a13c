use dioxus::prelude::*;
use dioxus_router::use_navigator;

use lingo_core::model::ActivityKind;
use services::{ApiError, ChatThread, RunnerStep};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::activity_widgets::{
    ListeningWidget, MatchingWidget, OrderingWidget, SpeakingWidget,
};
use crate::views::components::LevelBar;
use crate::views::state::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AuthState, LessonVm, force_sign_out};

/// Hosts one lesson run: mounts the widget for the current activity, consumes
/// its completion events, and finalizes after the last one.
#[component]
pub fn LessonView(lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<Option<AuthState>>>();
    let mut chat_slot = use_context::<Signal<Option<ChatThread>>>();
    let navigator = use_navigator();

    let vm = use_signal(|| None::<LessonVm>);

    let backend = ctx.backend();
    let flow = ctx.lesson_flow();
    let auth_service = ctx.auth_service();
    let resource = use_resource(move || {
        let backend = backend.clone();
        let flow = flow.clone();
        let auth_service = auth_service.clone();
        let mut vm = vm;
        async move {
            let Some(credential) = auth.read().as_ref().and_then(AuthState::credential) else {
                return Err(ViewError::SignedOut);
            };
            let lessons = match backend.lessons(&credential).await {
                Ok(lessons) => lessons,
                Err(ApiError::Unauthorized) => {
                    force_sign_out(auth, &auth_service).await;
                    return Err(ViewError::SignedOut);
                }
                Err(_) => return Err(ViewError::Unknown),
            };
            let lesson = lessons
                .into_iter()
                .find(|lesson| lesson.id().value() == lesson_id)
                .ok_or(ViewError::NotFound)?;
            let started = LessonVm::start(&flow, lesson).map_err(|_| ViewError::NotFound)?;
            vm.set(Some(started));
            Ok(())
        }
    });
    let state = view_state_from_resource(&resource);

    let flow_for_complete = ctx.lesson_flow();
    let on_activity_complete = use_callback(move |()| {
        let flow = flow_for_complete.clone();
        let mut vm = vm;
        let mut auth = auth;
        spawn(async move {
            let step = {
                let mut guard = vm.write();
                let Some(lesson_vm) = guard.as_mut() else {
                    return;
                };
                match lesson_vm.activity_complete(&flow) {
                    Ok(step) => step,
                    Err(_) => return,
                }
            };
            if step != RunnerStep::ReadyToFinalize {
                return;
            }

            // Best-effort finalization: one attempt, then the score screen
            // whatever the backend said. The run session is over either way.
            let taken_vm = vm.write().take();
            let Some(lesson_vm) = taken_vm else {
                return;
            };
            let taken_auth = auth.write().take();
            let Some(mut auth_state) = taken_auth else {
                return;
            };
            let outcome = flow
                .finalize(
                    lesson_vm.runner(),
                    &mut auth_state.session,
                    &mut auth_state.ledger,
                )
                .await;
            let still_signed_in = auth_state.is_signed_in();
            auth.set(Some(auth_state));

            if still_signed_in {
                navigator.replace(Route::Score {
                    acknowledged: outcome.acknowledged(),
                });
            } else {
                navigator.replace(Route::Login {});
            }
        });
    });

    let on_open_chat = use_callback(move |()| {
        let thread = vm.read().as_ref().map(LessonVm::chat_thread);
        if let Some(thread) = thread {
            chat_slot.set(Some(thread));
            navigator.push(Route::Chat {});
        }
    });

    let vm_guard = vm.read();
    let header = vm_guard.as_ref().map(|lesson_vm| {
        let progress = lesson_vm.progress();
        (
            lesson_vm.lesson_title().to_string(),
            lesson_vm.activity_title().to_string(),
            progress.step,
            progress.total,
        )
    });
    let widget_kind = vm_guard
        .as_ref()
        .map(|lesson_vm| lesson_vm.runner().current_activity().kind());
    drop(vm_guard);

    rsx! {
        div { class: "page",
            LevelBar {}
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "page__hint", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "notice notice--error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| {
                            navigator.replace(Route::Lessons {});
                        },
                        "Back to Lessons"
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some((lesson_title, activity_title, step, total)) = header {
                        h2 { class: "page__title", "{lesson_title} (Step {step}/{total})" }
                        div { class: "activity",
                            h3 { class: "activity__title", "{activity_title}" }
                            match widget_kind {
                                Some(ActivityKind::Matching) => rsx! {
                                    MatchingWidget { vm, on_complete: on_activity_complete }
                                },
                                Some(ActivityKind::Ordering) => rsx! {
                                    OrderingWidget { vm, on_complete: on_activity_complete }
                                },
                                Some(ActivityKind::Listening) => rsx! {
                                    ListeningWidget { vm, on_complete: on_activity_complete }
                                },
                                Some(ActivityKind::Speaking) => rsx! {
                                    SpeakingWidget { vm, on_complete: on_activity_complete }
                                },
                                None => rsx! {},
                            }
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| on_open_chat.call(()),
                            "Practice with AI Tutor"
                        }
                    }
                },
            }
        }
    }
}
