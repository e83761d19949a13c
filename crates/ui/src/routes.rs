use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator, use_route};

use crate::views::{
    ChatView, LessonView, LessonsView, LoginView, ScoreView, SignUpView,
};
use crate::vm::AuthState;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LoginView)] Login {},
        #[route("/signup", SignUpView)] SignUp {},
        #[route("/lessons", LessonsView)] Lessons {},
        #[route("/lessons/:lesson_id", LessonView)] Lesson { lesson_id: u64 },
        #[route("/chat", ChatView)] Chat {},
        #[route("/score/:acknowledged", ScoreView)] Score { acknowledged: bool },
}

impl Route {
    fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login {} | Route::SignUp {})
    }
}

/// Single gate between the auth screens and the rest of the app: signed-out
/// users land on Login, signed-in users never see the auth screens.
#[component]
fn Layout() -> Element {
    let auth = use_context::<Signal<Option<AuthState>>>();
    let route = use_route::<Route>();
    let navigator = use_navigator();

    let signed_in = auth
        .read()
        .as_ref()
        .is_some_and(AuthState::is_signed_in);

    let route_for_effect = route.clone();
    use_effect(move || {
        let signed_in = auth
            .read()
            .as_ref()
            .is_some_and(AuthState::is_signed_in);
        if signed_in && !route_for_effect.requires_auth() {
            navigator.replace(Route::Lessons {});
        } else if !signed_in && route_for_effect.requires_auth() {
            navigator.replace(Route::Login {});
        }
    });

    // Avoid flashing an authed screen while the redirect lands.
    if signed_in == route.requires_auth() {
        rsx! {
            main { class: "screen",
                Outlet::<Route> {}
            }
        }
    } else {
        rsx! {
            main { class: "screen" }
        }
    }
}
