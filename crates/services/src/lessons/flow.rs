use std::sync::Arc;

use tracing::warn;

use lingo_core::model::Lesson;

use crate::Clock;
use crate::backend::LessonBackend;
use crate::error::{ApiError, LessonRunError};
use crate::lessons::runner::{LessonRunner, RunnerStep};
use crate::progress_ledger::ProgressLedger;
use crate::session_context::SessionContext;

/// Result of lesson finalization. Both variants navigate to the score view;
/// `Unacknowledged` additionally surfaces a retry notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The backend recorded the completion and returned the new total.
    Acknowledged { total_experience: u32 },
    /// The completion call failed. The attempt was made once; the learner
    /// still sees the score screen.
    Unacknowledged,
}

impl FinalizeOutcome {
    #[must_use]
    pub fn acknowledged(&self) -> bool {
        matches!(self, FinalizeOutcome::Acknowledged { .. })
    }
}

/// Orchestrates lesson runs and their best-effort finalization.
#[derive(Clone)]
pub struct LessonFlowService {
    clock: Clock,
    backend: Arc<dyn LessonBackend>,
}

impl LessonFlowService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn LessonBackend>) -> Self {
        Self { clock, backend }
    }

    /// Open a lesson for running.
    ///
    /// # Errors
    ///
    /// Returns `LessonRunError::InvalidLesson` for empty or malformed lessons.
    pub fn start(&self, lesson: Lesson) -> Result<LessonRunner, LessonRunError> {
        LessonRunner::start(lesson, self.clock.now())
    }

    /// Consume one activity-completion event.
    ///
    /// # Errors
    ///
    /// Returns `LessonRunError::Finished` if the run already ended.
    pub fn activity_complete(
        &self,
        runner: &mut LessonRunner,
    ) -> Result<RunnerStep, LessonRunError> {
        runner.advance(self.clock.now())
    }

    /// Report the completed run to the backend and forward the returned
    /// experience total to the ledger.
    ///
    /// Finalization failure is non-fatal: one attempt is made, the failure
    /// is logged and flagged for a retry notice, and the caller navigates to
    /// the score view either way. A rejected credential also forces a
    /// sign-out.
    pub async fn finalize(
        &self,
        runner: &LessonRunner,
        session: &mut SessionContext,
        ledger: &mut ProgressLedger,
    ) -> FinalizeOutcome {
        let Some(credential) = session.credential().cloned() else {
            warn!(lesson_id = %runner.lesson_id(), "finalize without a credential");
            return FinalizeOutcome::Unacknowledged;
        };

        match self
            .backend
            .complete_lesson(&credential, runner.lesson_id())
            .await
        {
            Ok(total_experience) => {
                ledger.set_experience(total_experience).await;
                FinalizeOutcome::Acknowledged { total_experience }
            }
            Err(ApiError::Unauthorized) => {
                warn!(lesson_id = %runner.lesson_id(), "credential rejected during finalize");
                session.sign_out().await;
                ledger.reset();
                FinalizeOutcome::Unacknowledged
            }
            Err(err) => {
                warn!(lesson_id = %runner.lesson_id(), error = %err, "failed to record lesson completion");
                FinalizeOutcome::Unacknowledged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lingo_core::model::{Activity, Credential, LessonId, WordPair};
    use lingo_core::time::fixed_clock;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::repository::InMemoryRepository;

    use crate::backend::{LoginGrant, SpeechGrade};

    struct CompletionBackend {
        succeed: bool,
        calls: AtomicUsize,
    }

    impl CompletionBackend {
        fn new(succeed: bool) -> Self {
            Self {
                succeed,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LessonBackend for CompletionBackend {
        async fn login(&self, _u: &str, _p: &str) -> Result<LoginGrant, ApiError> {
            unreachable!("login not used in finalize tests")
        }
        async fn register(&self, _u: &str, _p: &str, _e: &str) -> Result<(), ApiError> {
            unreachable!("register not used in finalize tests")
        }
        async fn lessons(&self, _c: &Credential) -> Result<Vec<Lesson>, ApiError> {
            Ok(Vec::new())
        }
        async fn synthesize_speech(&self, _c: &Credential, _t: &str) -> Result<String, ApiError> {
            unreachable!("synthesis not used in finalize tests")
        }
        async fn transcribe_speech(
            &self,
            _c: &Credential,
            _a: &str,
            _p: &str,
            _pl: &str,
        ) -> Result<SpeechGrade, ApiError> {
            unreachable!("transcription not used in finalize tests")
        }
        async fn chat_turn(
            &self,
            _c: &Credential,
            _m: &str,
            _ctx: &Activity,
            _t: &str,
        ) -> Result<String, ApiError> {
            unreachable!("chat not used in finalize tests")
        }
        async fn complete_lesson(
            &self,
            _c: &Credential,
            _id: LessonId,
        ) -> Result<u32, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(400)
            } else {
                Err(ApiError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
            }
        }
    }

    fn one_activity_lesson() -> Lesson {
        Lesson::new(
            LessonId::new(9),
            "Unit 9",
            vec![Activity::Matching {
                title: "Match".into(),
                pairs: vec![WordPair::new("cat", "chat")],
            }],
            false,
        )
    }

    async fn signed_in_state() -> (SessionContext, ProgressLedger) {
        let repo = Arc::new(InMemoryRepository::new());
        let mut session = SessionContext::new(Arc::clone(&repo) as _);
        session.sign_in(Credential::new("tok-1")).await.unwrap();
        (session, ProgressLedger::new(repo))
    }

    #[tokio::test]
    async fn finalize_success_forwards_total_to_ledger() {
        let backend = Arc::new(CompletionBackend::new(true));
        let flow = LessonFlowService::new(fixed_clock(), Arc::clone(&backend) as _);
        let (mut session, mut ledger) = signed_in_state().await;

        let mut runner = flow.start(one_activity_lesson()).unwrap();
        assert_eq!(
            flow.activity_complete(&mut runner).unwrap(),
            RunnerStep::ReadyToFinalize
        );

        let outcome = flow.finalize(&runner, &mut session, &mut ledger).await;
        assert_eq!(
            outcome,
            FinalizeOutcome::Acknowledged {
                total_experience: 400
            }
        );
        assert_eq!(ledger.experience(), 400);
        assert_eq!(ledger.level(), 2);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn finalize_failure_is_non_fatal_and_attempted_once() {
        let backend = Arc::new(CompletionBackend::new(false));
        let flow = LessonFlowService::new(fixed_clock(), Arc::clone(&backend) as _);
        let (mut session, mut ledger) = signed_in_state().await;

        let mut runner = flow.start(one_activity_lesson()).unwrap();
        flow.activity_complete(&mut runner).unwrap();

        let outcome = flow.finalize(&runner, &mut session, &mut ledger).await;
        assert_eq!(outcome, FinalizeOutcome::Unacknowledged);
        // Local state untouched, learner still signed in, exactly one attempt.
        assert_eq!(ledger.experience(), 0);
        assert!(session.is_signed_in());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
