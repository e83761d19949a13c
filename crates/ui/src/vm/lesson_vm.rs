use lingo_core::model::{Activity, Lesson};
use services::{
    ChatThread, LessonFlowService, LessonProgress, LessonRunError, LessonRunner,
    ListeningExercise, MatchingBoard, OrderingBoard, RunnerStep, SpeakingExercise,
};

/// Widget state for the activity currently on screen.
///
/// Derived once when the activity starts and kept for its whole lifetime, so
/// shuffles and selections survive re-renders.
pub enum ActivityVm {
    Matching(MatchingBoard),
    Ordering(OrderingBoard),
    Listening(ListeningExercise),
    Speaking(SpeakingExercise),
}

impl ActivityVm {
    fn for_activity(activity: &Activity) -> Self {
        match activity {
            Activity::Matching { pairs, .. } => {
                ActivityVm::Matching(MatchingBoard::new(pairs.clone()))
            }
            Activity::Ordering { prompt, words, .. } => {
                ActivityVm::Ordering(OrderingBoard::new(prompt.clone(), words.clone()))
            }
            Activity::Listening {
                prompt_audio_text,
                options,
                correct_answer,
                ..
            } => ActivityVm::Listening(ListeningExercise::new(
                prompt_audio_text.clone(),
                options.clone(),
                correct_answer.clone(),
            )),
            Activity::Speaking { prompt, .. } => {
                ActivityVm::Speaking(SpeakingExercise::new(prompt.clone()))
            }
        }
    }
}

/// One open lesson: the runner plus the live widget for its current activity.
pub struct LessonVm {
    runner: LessonRunner,
    widget: ActivityVm,
}

impl LessonVm {
    /// # Errors
    ///
    /// Returns `LessonRunError::InvalidLesson` for empty or malformed lessons.
    pub fn start(flow: &LessonFlowService, lesson: Lesson) -> Result<Self, LessonRunError> {
        let runner = flow.start(lesson)?;
        let widget = ActivityVm::for_activity(runner.current_activity());
        Ok(Self { runner, widget })
    }

    #[must_use]
    pub fn runner(&self) -> &LessonRunner {
        &self.runner
    }

    #[must_use]
    pub fn lesson_title(&self) -> &str {
        self.runner.lesson_title()
    }

    #[must_use]
    pub fn activity_title(&self) -> &str {
        self.runner.current_activity().title()
    }

    #[must_use]
    pub fn progress(&self) -> LessonProgress {
        self.runner.progress()
    }

    #[must_use]
    pub fn widget(&self) -> &ActivityVm {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut ActivityVm {
        &mut self.widget
    }

    /// A tutor chat thread seeded from the activity on screen.
    #[must_use]
    pub fn chat_thread(&self) -> ChatThread {
        ChatThread::new(
            self.runner.lesson_title(),
            self.runner.current_activity().clone(),
        )
    }

    /// Consume the current widget's completion: advance the runner and, when
    /// there is a next activity, derive its widget state.
    ///
    /// # Errors
    ///
    /// Returns `LessonRunError::Finished` if the run already ended.
    pub fn activity_complete(
        &mut self,
        flow: &LessonFlowService,
    ) -> Result<RunnerStep, LessonRunError> {
        let step = flow.activity_complete(&mut self.runner)?;
        if step == RunnerStep::Next {
            self.widget = ActivityVm::for_activity(self.runner.current_activity());
        }
        Ok(step)
    }
}
