use dioxus::prelude::*;

use lingo_core::model::Progress;

use crate::vm::AuthState;

/// Level header shown on every signed-in screen: derived level, bar fill,
/// and the raw experience total.
#[component]
pub fn LevelBar() -> Element {
    let auth = use_context::<Signal<Option<AuthState>>>();
    let progress = auth
        .read()
        .as_ref()
        .map_or_else(Progress::default, AuthState::progress);
    let percent = progress.level_fraction() * 100.0;

    rsx! {
        div { class: "level-bar",
            span { class: "level-bar__label", "Level {progress.level()}" }
            div { class: "level-bar__outer",
                div { class: "level-bar__inner", style: "width: {percent}%" }
            }
            span { class: "level-bar__label", "{progress.experience()} XP" }
        }
    }
}
