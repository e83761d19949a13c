use dioxus::prelude::*;
use dioxus_router::use_navigator;

use lingo_core::model::Lesson;
use services::ApiError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::components::LevelBar;
use crate::views::state::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AuthState, force_sign_out};

#[component]
pub fn LessonsView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<Option<AuthState>>>();
    let navigator = use_navigator();

    let backend = ctx.backend();
    let auth_service = ctx.auth_service();
    // Refetched on every visit: the completion flags move under us whenever a
    // lesson is finished.
    let resource = use_resource(move || {
        let backend = backend.clone();
        let auth_service = auth_service.clone();
        async move {
            let Some(credential) = auth.read().as_ref().and_then(AuthState::credential) else {
                return Err(ViewError::SignedOut);
            };
            match backend.lessons(&credential).await {
                Ok(lessons) => Ok(lessons),
                Err(ApiError::Unauthorized) => {
                    force_sign_out(auth, &auth_service).await;
                    Err(ViewError::SignedOut)
                }
                Err(_) => Err(ViewError::Unknown),
            }
        }
    });
    let state = view_state_from_resource(&resource);

    let on_sign_out = {
        let auth_service = ctx.auth_service();
        use_callback(move |()| {
            let auth_service = auth_service.clone();
            spawn(async move {
                force_sign_out(auth, &auth_service).await;
                navigator.replace(Route::Login {});
            });
        })
    };

    rsx! {
        div { class: "page",
            LevelBar {}
            h2 { class: "page__title", "Lessons" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "page__hint", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "notice notice--error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(lessons) => rsx! {
                    ul { class: "lesson-list",
                        for lesson in lessons {
                            LessonRow { lesson: lesson.clone() }
                        }
                    }
                },
            }
            button {
                class: "btn btn-secondary",
                onclick: move |_| on_sign_out.call(()),
                "Sign Out"
            }
        }
    }
}

#[component]
fn LessonRow(lesson: Lesson) -> Element {
    let navigator = use_navigator();
    let lesson_id = lesson.id().value();
    let row_class = if lesson.completed() {
        "lesson-list__item lesson-list__item--completed"
    } else {
        "lesson-list__item"
    };

    rsx! {
        li {
            button {
                class: "{row_class}",
                onclick: move |_| {
                    navigator.push(Route::Lesson { lesson_id });
                },
                span { class: "lesson-list__title", "{lesson.title()}" }
                if lesson.completed() {
                    span { class: "lesson-list__check", "✓" }
                }
            }
        }
    }
}
