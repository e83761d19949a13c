use std::time::Duration;

use lingo_core::model::Credential;

use crate::audio::AudioSink;
use crate::backend::LessonBackend;
use crate::error::ListenError;

/// Pause between a correct answer and reporting the activity as done.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(500);
/// How long the incorrect notice shows before the options re-arm.
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Outcome of choosing an answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Right answer; completion fires after `COMPLETION_DELAY`.
    Correct,
    /// Wrong answer; call `rearm` after `RETRY_DELAY` so the learner can
    /// retry.
    Incorrect,
    /// A selection is already pending evaluation (or the exercise is solved);
    /// the tap is dropped.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AnswerPhase {
    Ready,
    Pending { choice: String },
    Solved,
}

/// Listening exercise: play synthesized prompt audio, pick the matching
/// option.
///
/// Playback and answering are independent guards: at most one audio request
/// is in flight or playing, and at most one selection is pending evaluation.
#[derive(Debug, Clone)]
pub struct ListeningExercise {
    prompt_text: String,
    options: Vec<String>,
    correct_answer: String,
    playing: bool,
    answer: AnswerPhase,
}

impl ListeningExercise {
    #[must_use]
    pub fn new(
        prompt_text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            options,
            correct_answer: correct_answer.into(),
            playing: false,
            answer: AnswerPhase::Ready,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The selected option while it is pending evaluation.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match &self.answer {
            AnswerPhase::Pending { choice } => Some(choice),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answer == AnswerPhase::Solved
    }

    /// Claim the playback slot. Returns the text to synthesize, or `None`
    /// when a request is already in flight or playing (the tap is ignored).
    pub fn begin_playback(&mut self) -> Option<String> {
        if self.playing {
            return None;
        }
        self.playing = true;
        Some(self.prompt_text.clone())
    }

    /// Release the playback slot once playback finished or failed.
    pub fn finish_playback(&mut self) {
        self.playing = false;
    }

    /// Choose an answer option. One selection at a time: further taps are
    /// ignored until `rearm` (after a wrong answer) or completion.
    pub fn choose(&mut self, option: &str) -> AnswerOutcome {
        if self.answer != AnswerPhase::Ready {
            return AnswerOutcome::Ignored;
        }
        if option == self.correct_answer {
            self.answer = AnswerPhase::Solved;
            AnswerOutcome::Correct
        } else {
            self.answer = AnswerPhase::Pending {
                choice: option.to_owned(),
            };
            AnswerOutcome::Incorrect
        }
    }

    /// Restore the answerable state after a wrong selection.
    pub fn rearm(&mut self) {
        if matches!(self.answer, AnswerPhase::Pending { .. }) {
            self.answer = AnswerPhase::Ready;
        }
    }
}

/// Fetch the synthesized audio locator and play it through the sink.
///
/// Callers claim the exercise's playback slot first (`begin_playback`) and
/// release it when this resolves; dropping the future mid-flight drops the
/// sink's resource with it.
///
/// # Errors
///
/// Returns `ListenError` for backend or playback failures.
pub async fn fetch_and_play(
    backend: &dyn LessonBackend,
    credential: &Credential,
    sink: &dyn AudioSink,
    text: &str,
) -> Result<(), ListenError> {
    let locator = backend.synthesize_speech(credential, text).await?;
    sink.play(&locator).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise() -> ListeningExercise {
        ListeningExercise::new(
            "apple",
            vec!["apple".into(), "apply".into(), "ample".into()],
            "apple",
        )
    }

    #[test]
    fn playback_slot_rejects_overlap() {
        let mut ex = exercise();
        assert_eq!(ex.begin_playback().as_deref(), Some("apple"));
        // Rapid second and third taps while in flight are ignored.
        assert_eq!(ex.begin_playback(), None);
        assert_eq!(ex.begin_playback(), None);

        ex.finish_playback();
        assert!(ex.begin_playback().is_some());
    }

    #[test]
    fn correct_choice_solves_and_locks() {
        let mut ex = exercise();
        assert_eq!(ex.choose("apple"), AnswerOutcome::Correct);
        assert!(ex.is_complete());
        assert_eq!(ex.choose("apply"), AnswerOutcome::Ignored);
    }

    #[test]
    fn wrong_choice_locks_until_rearmed() {
        let mut ex = exercise();
        assert_eq!(ex.choose("apply"), AnswerOutcome::Incorrect);
        assert_eq!(ex.selected(), Some("apply"));

        // No second selection while one is pending evaluation.
        assert_eq!(ex.choose("apple"), AnswerOutcome::Ignored);

        ex.rearm();
        assert_eq!(ex.selected(), None);
        assert_eq!(ex.choose("apple"), AnswerOutcome::Correct);
    }

    #[test]
    fn rearm_does_not_unsolve() {
        let mut ex = exercise();
        ex.choose("apple");
        ex.rearm();
        assert!(ex.is_complete());
    }
}
