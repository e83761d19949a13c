use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::routes::Route;
use crate::views::components::LevelBar;
use crate::vm::AuthState;

/// End-of-lesson screen. Shown after finalization whether or not the backend
/// acknowledged it; an unacknowledged run carries a retry notice.
#[component]
pub fn ScoreView(acknowledged: bool) -> Element {
    let auth = use_context::<Signal<Option<AuthState>>>();
    let navigator = use_navigator();

    let total = auth
        .read()
        .as_ref()
        .map_or(0, |state| state.progress().experience());

    rsx! {
        div { class: "page page--center",
            LevelBar {}
            h2 { class: "score__headline", "Lesson Complete!" }
            p { class: "score__total", "{total} XP" }
            if !acknowledged {
                p { class: "notice notice--error",
                    "Error saving progress. Please try again."
                }
            }
            button {
                class: "btn btn-primary",
                onclick: move |_| {
                    navigator.replace(Route::Lessons {});
                },
                "Continue"
            }
        }
    }
}
