use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::AuthError;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn SignUpView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut notice = use_signal(|| None::<&'static str>);

    let auth_service = ctx.auth_service();
    let on_submit = use_callback(move |()| {
        if busy() {
            return;
        }
        let auth_service = auth_service.clone();
        let mut busy = busy;
        let mut notice = notice;
        spawn(async move {
            busy.set(true);
            let result = auth_service
                .register(&username(), &password(), &email())
                .await;
            busy.set(false);
            match result {
                Ok(()) => {
                    // Registration is status-only; the learner logs in next.
                    navigator.push(Route::Login {});
                }
                Err(AuthError::MissingFields) => {
                    notice.set(Some("Fill in every field."));
                }
                Err(_) => {
                    notice.set(Some("Sign up failed. Please try again."));
                }
            }
        });
    });

    rsx! {
        div { class: "auth-page",
            h1 { class: "auth-page__name", "Betterlingo" }
            p { class: "auth-page__tagline", "Create account" }
            input {
                class: "auth-input",
                r#type: "text",
                placeholder: "Username",
                value: "{username}",
                oninput: move |evt| username.set(evt.value()),
            }
            input {
                class: "auth-input",
                r#type: "email",
                placeholder: "Email",
                value: "{email}",
                oninput: move |evt| email.set(evt.value()),
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
                if busy() { "Creating..." } else { "Sign Up" }
            }
            if let Some(message) = notice() {
                p { class: "notice notice--error", "{message}" }
            }
            Link { class: "auth-page__switch", to: Route::Login {}, "Have an account? Login" }
        }
    }
}
