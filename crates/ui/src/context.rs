use std::sync::{Arc, Mutex};

use services::{
    AudioSink, AuthService, LessonBackend, LessonFlowService, Microphone,
};

use crate::vm::AuthState;

/// Dependencies the views pull through `use_context`.
///
/// Built once by the composition root (`crates/app`) and handed to the Dioxus
/// launch builder. The restored auth state rides along as a one-shot payload
/// the root component moves into its signal on first render.
#[derive(Clone)]
pub struct AppContext {
    lesson_flow: Arc<LessonFlowService>,
    auth_service: Arc<AuthService>,
    backend: Arc<dyn LessonBackend>,
    audio: Arc<dyn AudioSink>,
    microphone: Arc<dyn Microphone>,
    initial_auth: Arc<Mutex<Option<AuthState>>>,
}

impl AppContext {
    #[must_use]
    pub fn new(
        lesson_flow: Arc<LessonFlowService>,
        auth_service: Arc<AuthService>,
        backend: Arc<dyn LessonBackend>,
        audio: Arc<dyn AudioSink>,
        microphone: Arc<dyn Microphone>,
        initial_auth: AuthState,
    ) -> Self {
        Self {
            lesson_flow,
            auth_service,
            backend,
            audio,
            microphone,
            initial_auth: Arc::new(Mutex::new(Some(initial_auth))),
        }
    }

    #[must_use]
    pub fn lesson_flow(&self) -> Arc<LessonFlowService> {
        Arc::clone(&self.lesson_flow)
    }

    #[must_use]
    pub fn auth_service(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth_service)
    }

    #[must_use]
    pub fn backend(&self) -> Arc<dyn LessonBackend> {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn audio(&self) -> Arc<dyn AudioSink> {
        Arc::clone(&self.audio)
    }

    #[must_use]
    pub fn microphone(&self) -> Arc<dyn Microphone> {
        Arc::clone(&self.microphone)
    }

    /// The restored session state, consumable exactly once by the root
    /// component.
    #[must_use]
    pub fn take_initial_auth(&self) -> Option<AuthState> {
        self.initial_auth.lock().ok().and_then(|mut guard| guard.take())
    }
}
