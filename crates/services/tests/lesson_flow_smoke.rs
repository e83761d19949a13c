use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use lingo_core::model::{Activity, Credential, Lesson, LessonId, WordPair};
use lingo_core::time::fixed_clock;
use services::activities::{MatchAttempt, MatchingBoard, OrderingBoard, OrderingCheck};
use services::{
    ApiError, FinalizeOutcome, LessonBackend, LessonFlowService, LoginGrant, ProgressLedger,
    RunnerStep, SessionContext, SpeechGrade,
};
use storage::repository::InMemoryRepository;

struct ScriptedBackend {
    complete_calls: AtomicUsize,
    complete_result: fn() -> Result<u32, ApiError>,
}

impl ScriptedBackend {
    fn new(complete_result: fn() -> Result<u32, ApiError>) -> Self {
        Self {
            complete_calls: AtomicUsize::new(0),
            complete_result,
        }
    }
}

#[async_trait]
impl LessonBackend for ScriptedBackend {
    async fn login(&self, _username: &str, _password: &str) -> Result<LoginGrant, ApiError> {
        Ok(LoginGrant {
            credential: Credential::new("tok-smoke"),
            experience: 0,
        })
    }

    async fn register(&self, _u: &str, _p: &str, _e: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn lessons(&self, _credential: &Credential) -> Result<Vec<Lesson>, ApiError> {
        Ok(vec![smoke_lesson()])
    }

    async fn synthesize_speech(
        &self,
        _credential: &Credential,
        _text: &str,
    ) -> Result<String, ApiError> {
        Ok("http://audio/prompt.mp3".into())
    }

    async fn transcribe_speech(
        &self,
        _credential: &Credential,
        _audio_base64: &str,
        prompt: &str,
        _platform: &str,
    ) -> Result<SpeechGrade, ApiError> {
        Ok(SpeechGrade {
            transcribed_text: prompt.to_owned(),
            is_correct: true,
        })
    }

    async fn chat_turn(
        &self,
        _credential: &Credential,
        _message: &str,
        _context: &Activity,
        _lesson_title: &str,
    ) -> Result<String, ApiError> {
        Ok("Great question!".into())
    }

    async fn complete_lesson(
        &self,
        _credential: &Credential,
        _lesson_id: LessonId,
    ) -> Result<u32, ApiError> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        (self.complete_result)()
    }
}

fn smoke_lesson() -> Lesson {
    Lesson::new(
        LessonId::new(1),
        "Unit 1 - Animals",
        vec![
            Activity::Matching {
                title: "Match the words".into(),
                pairs: vec![WordPair::new("cat", "chat"), WordPair::new("dog", "chien")],
            },
            Activity::Ordering {
                title: "Build the sentence".into(),
                prompt: "I like dogs".into(),
                words: vec!["dogs".into(), "I".into(), "like".into()],
            },
        ],
        false,
    )
}

async fn signed_in_state() -> (SessionContext, ProgressLedger) {
    let repo = Arc::new(InMemoryRepository::new());
    let mut session = SessionContext::new(Arc::clone(&repo) as _);
    session.sign_in(Credential::new("tok-smoke")).await.unwrap();
    (session, ProgressLedger::new(repo))
}

#[tokio::test]
async fn two_activity_lesson_finalizes_exactly_once() {
    let backend = Arc::new(ScriptedBackend::new(|| Ok(400)));
    let flow = LessonFlowService::new(fixed_clock(), Arc::clone(&backend) as _);
    let (mut session, mut ledger) = signed_in_state().await;

    let mut runner = flow.start(smoke_lesson()).unwrap();
    assert_eq!(runner.activity_index(), 0);

    // Activity 0: match both pairs on an unshuffled board.
    let Activity::Matching { pairs, .. } = runner.current_activity().clone() else {
        panic!("expected matching first");
    };
    let mut board = MatchingBoard::unshuffled(pairs);
    board.select("cat");
    assert_eq!(board.select("chat"), MatchAttempt::Matched);
    board.select("dog");
    assert_eq!(board.select("chien"), MatchAttempt::Finished);
    assert_eq!(flow.activity_complete(&mut runner).unwrap(), RunnerStep::Next);
    assert_eq!(runner.activity_index(), 1);

    // Activity 1: build "I like dogs" from ["dogs", "I", "like"].
    let Activity::Ordering { prompt, words, .. } = runner.current_activity().clone() else {
        panic!("expected ordering second");
    };
    let mut ordering = OrderingBoard::unshuffled(prompt, words);
    assert!(ordering.pick(1)); // "I"
    assert!(ordering.pick(1)); // "like"
    assert!(ordering.pick(0)); // "dogs"
    assert_eq!(ordering.check(), Some(OrderingCheck::Correct));
    assert_eq!(
        flow.activity_complete(&mut runner).unwrap(),
        RunnerStep::ReadyToFinalize
    );
    assert!(runner.is_complete());

    let outcome = flow.finalize(&runner, &mut session, &mut ledger).await;
    assert_eq!(
        outcome,
        FinalizeOutcome::Acknowledged {
            total_experience: 400
        }
    );
    assert_eq!(ledger.experience(), 400);
    assert_eq!(backend.complete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn finalize_navigates_to_score_on_both_outcomes() {
    for (result, acknowledged) in [
        ((|| Ok(100)) as fn() -> Result<u32, ApiError>, true),
        (
            || Err(ApiError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
            false,
        ),
    ] {
        let backend = Arc::new(ScriptedBackend::new(result));
        let flow = LessonFlowService::new(fixed_clock(), backend as _);
        let (mut session, mut ledger) = signed_in_state().await;

        let mut runner = flow.start(smoke_lesson()).unwrap();
        flow.activity_complete(&mut runner).unwrap();
        flow.activity_complete(&mut runner).unwrap();

        // Either way the caller gets an outcome value to navigate on; the
        // retry notice rides on `Unacknowledged`.
        let outcome = flow.finalize(&runner, &mut session, &mut ledger).await;
        assert_eq!(outcome.acknowledged(), acknowledged);
    }
}

#[tokio::test]
async fn rejected_credential_during_finalize_signs_out() {
    let backend = Arc::new(ScriptedBackend::new(|| Err(ApiError::Unauthorized)));
    let flow = LessonFlowService::new(fixed_clock(), backend as _);
    let (mut session, mut ledger) = signed_in_state().await;
    ledger.set_experience(300).await;

    let mut runner = flow.start(smoke_lesson()).unwrap();
    flow.activity_complete(&mut runner).unwrap();
    flow.activity_complete(&mut runner).unwrap();

    let outcome = flow.finalize(&runner, &mut session, &mut ledger).await;
    assert_eq!(outcome, FinalizeOutcome::Unacknowledged);
    assert!(!session.is_signed_in());
    assert_eq!(ledger.experience(), 0);
}
