//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::model::LessonError;
use storage::repository::StorageError;

use crate::audio::{AudioError, CaptureError};

/// Errors emitted by the backend API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("credential rejected by the backend")]
    Unauthorized,
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed response payload: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("username and password are required")]
    MissingFields,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the lesson runner and flow service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonRunError {
    #[error(transparent)]
    InvalidLesson(#[from] LessonError),
    #[error("lesson run already finished")]
    Finished,
}

/// Errors emitted while fetching and playing listening-exercise audio.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ListenError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// Errors emitted while recording and grading a speaking attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpeakError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}
