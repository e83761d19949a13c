//! Contract for the remote learning backend.
//!
//! The HTTP client implements this trait; tests drive the engine with fakes.

use async_trait::async_trait;

use lingo_core::model::{Activity, Credential, Lesson, LessonId};

use crate::error::ApiError;

/// Successful login: the issued credential plus the server-side experience
/// total for the account.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub credential: Credential,
    pub experience: u32,
}

/// Transcription-and-grading verdict for a speaking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechGrade {
    pub transcribed_text: String,
    pub is_correct: bool,
}

/// Coarse platform identifier sent with speech uploads so the backend picks
/// the right decoder.
#[must_use]
pub fn platform_tag() -> &'static str {
    std::env::consts::OS
}

/// The seven backend operations the client consumes.
///
/// Authenticated operations take the credential explicitly; a rejected
/// credential surfaces as `ApiError::Unauthorized` and callers are expected
/// to force a sign-out.
#[async_trait]
pub trait LessonBackend: Send + Sync {
    /// Exchange username/password for a credential and the experience total.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for rejected credentials or transport failures.
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ApiError>;

    /// Create an account. Success is status-only; the user logs in afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for rejected registrations or transport failures.
    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), ApiError>;

    /// Fetch the lesson list with per-user completion flags.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for auth or transport failures.
    async fn lessons(&self, credential: &Credential) -> Result<Vec<Lesson>, ApiError>;

    /// Synthesize prompt audio; returns a playable resource locator.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for auth or transport failures.
    async fn synthesize_speech(
        &self,
        credential: &Credential,
        text: &str,
    ) -> Result<String, ApiError>;

    /// Upload an encoded recording for transcription and grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for auth or transport failures.
    async fn transcribe_speech(
        &self,
        credential: &Credential,
        audio_base64: &str,
        prompt: &str,
        platform: &str,
    ) -> Result<SpeechGrade, ApiError>;

    /// One AI-tutor exchange; returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for auth or transport failures.
    async fn chat_turn(
        &self,
        credential: &Credential,
        message: &str,
        context: &Activity,
        lesson_title: &str,
    ) -> Result<String, ApiError>;

    /// Record lesson completion; returns the updated experience total.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for auth or transport failures.
    async fn complete_lesson(
        &self,
        credential: &Credential,
        lesson_id: LessonId,
    ) -> Result<u32, ApiError>;
}
