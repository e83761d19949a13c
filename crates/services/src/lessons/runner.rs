use chrono::{DateTime, Utc};
use std::fmt;

use lingo_core::model::{Activity, Lesson, LessonId};

use super::progress::LessonProgress;
use crate::error::LessonRunError;

/// What followed an activity completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerStep {
    /// Moved to the next activity.
    Next,
    /// That was the last activity; the run is over and finalization should
    /// be attempted.
    ReadyToFinalize,
}

/// Ephemeral run through one lesson's activity sequence.
///
/// Created when a lesson is opened, discarded on navigation away or after
/// finalization. The activity index is 0-based and only ever moves forward;
/// `0 <= index < len` holds while the run is active.
pub struct LessonRunner {
    lesson: Lesson,
    index: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl LessonRunner {
    /// Open a lesson for running.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `LessonRunError::InvalidLesson` when the lesson has no
    /// activities or a payload does not match its type tag.
    pub fn start(lesson: Lesson, started_at: DateTime<Utc>) -> Result<Self, LessonRunError> {
        lesson.validate()?;
        Ok(Self {
            lesson,
            index: 0,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson.id()
    }

    #[must_use]
    pub fn lesson_title(&self) -> &str {
        self.lesson.title()
    }

    #[must_use]
    pub fn activity_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The activity the learner is on. Always present: the index stays in
    /// bounds even after the run completes.
    #[must_use]
    pub fn current_activity(&self) -> &Activity {
        &self.lesson.activities()[self.index]
    }

    /// Returns a summary of the current run progress.
    #[must_use]
    pub fn progress(&self) -> LessonProgress {
        LessonProgress {
            step: self.index + 1,
            total: self.lesson.len(),
            is_complete: self.is_complete(),
        }
    }

    /// Consume one activity-completion event.
    ///
    /// `completed_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `LessonRunError::Finished` if the run already ended.
    pub fn advance(&mut self, completed_at: DateTime<Utc>) -> Result<RunnerStep, LessonRunError> {
        if self.is_complete() {
            return Err(LessonRunError::Finished);
        }

        if self.index + 1 < self.lesson.len() {
            self.index += 1;
            Ok(RunnerStep::Next)
        } else {
            self.completed_at = Some(completed_at);
            Ok(RunnerStep::ReadyToFinalize)
        }
    }
}

impl fmt::Debug for LessonRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonRunner")
            .field("lesson_id", &self.lesson.id())
            .field("activities_len", &self.lesson.len())
            .field("index", &self.index)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}
