//! Device adapters for the desktop build.
//!
//! Real audio output and microphone capture are platform-driver territory and
//! stay out of this client; the stubs below keep the listening and speaking
//! flows honest. The sink acknowledges playback after logging the locator,
//! and the microphone reports the capability as denied so the speaking
//! widget surfaces its permission notice.

use async_trait::async_trait;
use tracing::info;

use services::{AudioError, AudioSink};

/// Sink that logs the locator instead of driving a device output.
#[derive(Clone, Copy, Default)]
pub struct LoggingAudioSink;

#[async_trait]
impl AudioSink for LoggingAudioSink {
    async fn play(&self, locator: &str) -> Result<(), AudioError> {
        info!(%locator, "audio playback requested");
        Ok(())
    }
}
