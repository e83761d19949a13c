use std::sync::Arc;

use reqwest::StatusCode;
use tracing::info;

use crate::backend::LessonBackend;
use crate::error::{ApiError, AuthError};
use crate::progress_ledger::ProgressLedger;
use crate::session_context::SessionContext;

/// Sign-in / sign-up flows on top of the backend and the session state.
#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn LessonBackend>,
}

impl AuthService {
    #[must_use]
    pub fn new(backend: Arc<dyn LessonBackend>) -> Self {
        Self { backend }
    }

    /// Log in and seed the session and ledger from the server's answer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` for blank inputs,
    /// `AuthError::InvalidCredentials` for rejected credentials, and
    /// propagates transport/storage failures.
    pub async fn sign_in(
        &self,
        session: &mut SessionContext,
        ledger: &mut ProgressLedger,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let grant = self
            .backend
            .login(username.trim(), password)
            .await
            .map_err(|err| match err {
                ApiError::Unauthorized | ApiError::HttpStatus(StatusCode::BAD_REQUEST) => {
                    AuthError::InvalidCredentials
                }
                other => AuthError::Api(other),
            })?;

        session.sign_in(grant.credential).await?;
        ledger.set_experience(grant.experience).await;
        info!(username = %username.trim(), "signed in");
        Ok(())
    }

    /// Create an account. Success is status-only; the caller returns to the
    /// login screen.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` for blank inputs and propagates
    /// backend rejections.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), AuthError> {
        if username.trim().is_empty() || password.is_empty() || email.trim().is_empty() {
            return Err(AuthError::MissingFields);
        }
        self.backend
            .register(username.trim(), password, email.trim())
            .await?;
        Ok(())
    }

    /// Drop the credential, clear the stored profile, and zero the ledger.
    pub async fn sign_out(&self, session: &mut SessionContext, ledger: &mut ProgressLedger) {
        session.sign_out().await;
        ledger.reset();
        info!("signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lingo_core::model::{Activity, Credential, Lesson, LessonId};
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    use crate::backend::{LoginGrant, SpeechGrade};

    struct FixedBackend {
        accept: bool,
    }

    #[async_trait]
    impl LessonBackend for FixedBackend {
        async fn login(&self, _username: &str, _password: &str) -> Result<LoginGrant, ApiError> {
            if self.accept {
                Ok(LoginGrant {
                    credential: Credential::new("tok-1"),
                    experience: 150,
                })
            } else {
                Err(ApiError::HttpStatus(StatusCode::BAD_REQUEST))
            }
        }

        async fn register(
            &self,
            _username: &str,
            _password: &str,
            _email: &str,
        ) -> Result<(), ApiError> {
            Ok(())
        }

        async fn lessons(&self, _credential: &Credential) -> Result<Vec<Lesson>, ApiError> {
            Ok(Vec::new())
        }

        async fn synthesize_speech(
            &self,
            _credential: &Credential,
            _text: &str,
        ) -> Result<String, ApiError> {
            Err(ApiError::MalformedResponse("unused".into()))
        }

        async fn transcribe_speech(
            &self,
            _credential: &Credential,
            _audio_base64: &str,
            _prompt: &str,
            _platform: &str,
        ) -> Result<SpeechGrade, ApiError> {
            Err(ApiError::MalformedResponse("unused".into()))
        }

        async fn chat_turn(
            &self,
            _credential: &Credential,
            _message: &str,
            _context: &Activity,
            _lesson_title: &str,
        ) -> Result<String, ApiError> {
            Err(ApiError::MalformedResponse("unused".into()))
        }

        async fn complete_lesson(
            &self,
            _credential: &Credential,
            _lesson_id: LessonId,
        ) -> Result<u32, ApiError> {
            Err(ApiError::MalformedResponse("unused".into()))
        }
    }

    fn fresh_state() -> (SessionContext, ProgressLedger) {
        let repo = Arc::new(InMemoryRepository::new());
        (
            SessionContext::new(Arc::clone(&repo) as _),
            ProgressLedger::new(repo),
        )
    }

    #[tokio::test]
    async fn sign_in_seeds_session_and_ledger() {
        let (mut session, mut ledger) = fresh_state();
        let auth = AuthService::new(Arc::new(FixedBackend { accept: true }));

        auth.sign_in(&mut session, &mut ledger, "amy", "pw")
            .await
            .unwrap();
        assert!(session.is_signed_in());
        assert_eq!(ledger.experience(), 150);
    }

    #[tokio::test]
    async fn rejected_login_maps_to_invalid_credentials() {
        let (mut session, mut ledger) = fresh_state();
        let auth = AuthService::new(Arc::new(FixedBackend { accept: false }));

        let err = auth
            .sign_in(&mut session, &mut ledger, "amy", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_any_request() {
        let (mut session, mut ledger) = fresh_state();
        let auth = AuthService::new(Arc::new(FixedBackend { accept: true }));

        let err = auth
            .sign_in(&mut session, &mut ledger, "  ", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));
    }

    #[tokio::test]
    async fn sign_out_resets_both_owners() {
        let (mut session, mut ledger) = fresh_state();
        let auth = AuthService::new(Arc::new(FixedBackend { accept: true }));
        auth.sign_in(&mut session, &mut ledger, "amy", "pw")
            .await
            .unwrap();

        auth.sign_out(&mut session, &mut ledger).await;
        assert!(!session.is_signed_in());
        assert_eq!(ledger.experience(), 0);
    }
}
