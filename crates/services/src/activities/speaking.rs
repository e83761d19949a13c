use std::fmt;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};

use lingo_core::model::Credential;

use crate::audio::RecordingHandle;
use crate::backend::{LessonBackend, SpeechGrade, platform_tag};
use crate::error::SpeakError;

/// Pause between a correct verdict and reporting the activity as done.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(1500);

/// Lifecycle of one speaking attempt.
///
/// `Incorrect` permits a fresh recording; `Correct` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakingPhase {
    Idle,
    Recording,
    Processing,
    Correct {
        transcribed: String,
    },
    Incorrect {
        /// Transcribed text when the backend graded a mismatch; `None` when
        /// the call itself failed.
        transcribed: Option<String>,
    },
}

/// What the caller should do after a verdict lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakingOutcome {
    /// Completion fires after `COMPLETION_DELAY`.
    Completed,
    /// A new recording attempt is permitted.
    Retry,
}

/// Speaking exercise: record the prompt, have the backend transcribe and
/// grade it.
///
/// One recording/processing cycle at a time; the machine refuses to start a
/// second cycle until the current one resolves.
pub struct SpeakingExercise {
    prompt: String,
    phase: SpeakingPhase,
    recorder: Option<Box<dyn RecordingHandle>>,
}

impl SpeakingExercise {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            phase: SpeakingPhase::Idle,
            recorder: None,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn phase(&self) -> &SpeakingPhase {
        &self.phase
    }

    /// True while a cycle is active and the start control must stay disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            SpeakingPhase::Recording | SpeakingPhase::Processing
        )
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, SpeakingPhase::Correct { .. })
    }

    /// Transcribed text to display, if any verdict carried one.
    #[must_use]
    pub fn transcribed(&self) -> Option<&str> {
        match &self.phase {
            SpeakingPhase::Correct { transcribed } => Some(transcribed),
            SpeakingPhase::Incorrect {
                transcribed: Some(text),
            } => Some(text),
            _ => None,
        }
    }

    /// Idle/Incorrect → Recording, holding the acquired capture handle.
    ///
    /// The microphone capability is acquired by the caller first; a denied
    /// acquisition never reaches this method, so the machine stays in `Idle`.
    /// Returns false (and drops the handle) if a cycle is already active.
    pub fn start_recording(&mut self, recorder: Box<dyn RecordingHandle>) -> bool {
        match self.phase {
            SpeakingPhase::Idle | SpeakingPhase::Incorrect { .. } => {
                self.recorder = Some(recorder);
                self.phase = SpeakingPhase::Recording;
                true
            }
            _ => false,
        }
    }

    /// Recording → Processing; hands the capture handle back so the caller
    /// can stop it and submit the payload for grading.
    pub fn begin_processing(&mut self) -> Option<Box<dyn RecordingHandle>> {
        if self.phase != SpeakingPhase::Recording {
            return None;
        }
        self.phase = SpeakingPhase::Processing;
        self.recorder.take()
    }

    /// Processing → Correct/Incorrect from the backend's verdict.
    pub fn resolve(&mut self, grade: SpeechGrade) -> SpeakingOutcome {
        if grade.is_correct {
            self.phase = SpeakingPhase::Correct {
                transcribed: grade.transcribed_text,
            };
            SpeakingOutcome::Completed
        } else {
            self.phase = SpeakingPhase::Incorrect {
                transcribed: Some(grade.transcribed_text),
            };
            SpeakingOutcome::Retry
        }
    }

    /// Processing → Incorrect when the grading call failed outright.
    pub fn fail_processing(&mut self) -> SpeakingOutcome {
        self.phase = SpeakingPhase::Incorrect { transcribed: None };
        SpeakingOutcome::Retry
    }
}

impl fmt::Debug for SpeakingExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeakingExercise")
            .field("prompt", &self.prompt)
            .field("phase", &self.phase)
            .field("recording_held", &self.recorder.is_some())
            .finish()
    }
}

/// Stop the capture, encode the payload for transport, and submit it with
/// the expected prompt and the coarse platform tag.
///
/// # Errors
///
/// Returns `SpeakError` for capture or backend failures; the caller maps
/// either into `fail_processing`.
pub async fn grade_recording(
    backend: &dyn LessonBackend,
    credential: &Credential,
    recorder: Box<dyn RecordingHandle>,
    prompt: &str,
) -> Result<SpeechGrade, SpeakError> {
    let audio = recorder.stop().await?;
    let encoded = general_purpose::STANDARD.encode(audio);
    let grade = backend
        .transcribe_speech(credential, &encoded, prompt, platform_tag())
        .await?;
    Ok(grade)
}
