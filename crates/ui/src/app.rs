use dioxus::prelude::*;
use dioxus_router::Router;

use services::ChatThread;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::AuthState;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();

    // The restored session state is moved into a signal exactly once; views
    // mutate it only through its own sign-in/sign-out/experience operations.
    use_context_provider(|| Signal::new(ctx.take_initial_auth()));
    // Chat hand-off slot: the lesson screen parks a seeded thread here before
    // navigating to the tutor.
    use_context_provider(|| Signal::new(None::<ChatThread>));

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Betterlingo" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
