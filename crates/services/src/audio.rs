//! Device seams for audio playback and microphone capture.
//!
//! Platform drivers are out of scope for this client; these traits are the
//! boundary the exercises talk to. Implementations own their device handles
//! and must release them when the returned future is dropped, so navigating
//! away from a widget releases any acquired resource.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AudioError {
    #[error("audio playback failed: {0}")]
    Playback(String),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("capture device error: {0}")]
    Device(String),
}

/// Plays a remote audio resource to completion.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Open the resource behind `locator` and play it through the device
    /// output. Resolves once playback finishes; dropping the future releases
    /// the resource.
    ///
    /// # Errors
    ///
    /// Returns `AudioError` if the resource cannot be opened or played.
    async fn play(&self, locator: &str) -> Result<(), AudioError>;
}

/// An in-progress capture returned by `Microphone::acquire`.
#[async_trait]
pub trait RecordingHandle: Send {
    /// Stop capturing and hand back the recorded audio payload.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError` if the device fails mid-capture.
    async fn stop(self: Box<Self>) -> Result<Vec<u8>, CaptureError>;
}

/// Microphone capability. Acquisition covers the permission check: a denied
/// permission surfaces as `CaptureError::PermissionDenied` before any capture
/// starts.
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Request the capability and start capturing.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::PermissionDenied` when the capability is not
    /// granted, or `CaptureError::Device` for driver failures.
    async fn acquire(&self) -> Result<Box<dyn RecordingHandle>, CaptureError>;
}

/// Playback stub for tests and headless builds: succeeds immediately and
/// remembers every locator it was asked to play.
#[derive(Clone, Default)]
pub struct NullAudioSink {
    played: Arc<Mutex<Vec<String>>>,
}

impl NullAudioSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locators played so far, in order.
    #[must_use]
    pub fn played(&self) -> Vec<String> {
        self.played.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AudioSink for NullAudioSink {
    async fn play(&self, locator: &str) -> Result<(), AudioError> {
        let mut guard = self
            .played
            .lock()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        guard.push(locator.to_owned());
        Ok(())
    }
}

/// Microphone stub for builds without capture support: every acquisition is
/// reported as a denied capability.
#[derive(Clone, Copy, Default)]
pub struct DeniedMicrophone;

#[async_trait]
impl Microphone for DeniedMicrophone {
    async fn acquire(&self) -> Result<Box<dyn RecordingHandle>, CaptureError> {
        Err(CaptureError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_sink_records_locators() {
        let sink = NullAudioSink::new();
        sink.play("http://audio/1.mp3").await.unwrap();
        sink.play("http://audio/2.mp3").await.unwrap();
        assert_eq!(sink.played(), vec!["http://audio/1.mp3", "http://audio/2.mp3"]);
    }

    #[tokio::test]
    async fn denied_microphone_never_grants() {
        let err = DeniedMicrophone.acquire().await.err().unwrap();
        assert!(matches!(err, CaptureError::PermissionDenied));
    }
}
