use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::AuthError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::AuthState;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<Option<AuthState>>>();
    let navigator = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut notice = use_signal(|| None::<&'static str>);

    let auth_service = ctx.auth_service();
    let on_submit = use_callback(move |()| {
        if busy() {
            return;
        }
        let auth_service = auth_service.clone();
        let mut auth = auth;
        let mut busy = busy;
        let mut notice = notice;
        spawn(async move {
            busy.set(true);
            let taken = auth.write().take();
            let Some(mut state) = taken else {
                busy.set(false);
                return;
            };
            let result = auth_service
                .sign_in(&mut state.session, &mut state.ledger, &username(), &password())
                .await;
            auth.set(Some(state));
            busy.set(false);
            match result {
                Ok(()) => {
                    notice.set(None);
                    navigator.push(Route::Lessons {});
                }
                Err(AuthError::MissingFields) => {
                    notice.set(Some("Enter a username and password."));
                }
                Err(AuthError::InvalidCredentials) => {
                    notice.set(Some("Login failed. Check your credentials."));
                }
                Err(_) => {
                    notice.set(Some("Login error. Please try again."));
                }
            }
        });
    });

    rsx! {
        div { class: "auth-page",
            h1 { class: "auth-page__name", "Betterlingo" }
            p { class: "auth-page__tagline", "Login" }
            input {
                class: "auth-input",
                r#type: "text",
                placeholder: "Username",
                value: "{username}",
                oninput: move |evt| username.set(evt.value()),
            }
            input {
                class: "auth-input",
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                oninput: move |evt| password.set(evt.value()),
            }
            button {
                class: "btn btn-primary",
                disabled: busy(),
                onclick: move |_| on_submit.call(()),
                if busy() { "Logging in..." } else { "Login" }
            }
            if let Some(message) = notice() {
                p { class: "notice notice--error", "{message}" }
            }
            Link { class: "auth-page__switch", to: Route::SignUp {}, "Sign up" }
        }
    }
}
