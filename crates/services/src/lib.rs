#![forbid(unsafe_code)]

pub mod activities;
pub mod api;
pub mod audio;
pub mod auth;
pub mod backend;
pub mod chat;
pub mod error;
pub mod lessons;
pub mod progress_ledger;
pub mod session_context;

pub use lingo_core::Clock;

pub use error::{ApiError, AuthError, LessonRunError, ListenError, SpeakError};

pub use activities::{
    AnswerOutcome, ListeningExercise, MatchAttempt, MatchingBoard, OrderingBoard, OrderingCheck,
    SpeakingExercise, SpeakingOutcome, SpeakingPhase, fetch_and_play, grade_recording,
};
pub use api::{ApiClient, ApiConfig};
pub use audio::{AudioError, AudioSink, CaptureError, Microphone, RecordingHandle};
pub use auth::AuthService;
pub use backend::{LessonBackend, LoginGrant, SpeechGrade, platform_tag};
pub use chat::{ChatMessage, ChatRole, ChatThread};
pub use lessons::{
    FinalizeOutcome, LessonFlowService, LessonProgress, LessonRunner, RunnerStep,
};
pub use progress_ledger::ProgressLedger;
pub use session_context::SessionContext;
