use std::fmt;
use std::sync::Arc;

use tracing::warn;

use lingo_core::model::Credential;
use storage::repository::{ProfileRepository, StorageError};

/// Single-owner session state: the credential and nothing else.
///
/// The context is passed explicitly to every component that needs it, and its
/// methods are the only write path for the credential. Presence of a
/// credential is necessary and sufficient to treat the user as signed in.
pub struct SessionContext {
    credential: Option<Credential>,
    profile: Arc<dyn ProfileRepository>,
}

impl SessionContext {
    /// A fresh, signed-out context.
    #[must_use]
    pub fn new(profile: Arc<dyn ProfileRepository>) -> Self {
        Self {
            credential: None,
            profile,
        }
    }

    /// Restore the credential from durable storage at process start.
    /// A blank or missing stored token means signed out.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn restore(profile: Arc<dyn ProfileRepository>) -> Result<Self, StorageError> {
        let snapshot = profile.load_profile().await?;
        Ok(Self {
            credential: Credential::from_stored(snapshot.credential),
            profile,
        })
    }

    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.credential.is_some()
    }

    /// Store the credential in memory and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be persisted; the in-memory
    /// credential is not set in that case, so a failed sign-in stays visible.
    pub async fn sign_in(&mut self, credential: Credential) -> Result<(), StorageError> {
        self.profile.save_credential(credential.token()).await?;
        self.credential = Some(credential);
        Ok(())
    }

    /// Drop the credential and clear the stored profile.
    ///
    /// Invalidation is unconditional: the in-memory credential is gone even
    /// if the storage delete fails (the failure is logged).
    pub async fn sign_out(&mut self) {
        self.credential = None;
        if let Err(err) = self.profile.clear_profile().await {
            warn!(error = %err, "failed to clear stored profile on sign-out");
        }
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("signed_in", &self.is_signed_in())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn restore_without_stored_token_is_signed_out() {
        let repo = Arc::new(InMemoryRepository::new());
        let session = SessionContext::restore(repo).await.unwrap();
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn sign_in_persists_and_restores() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut session = SessionContext::new(Arc::clone(&repo) as Arc<dyn ProfileRepository>);
        session.sign_in(Credential::new("tok-1")).await.unwrap();
        assert!(session.is_signed_in());

        let restored = SessionContext::restore(repo).await.unwrap();
        assert_eq!(restored.credential().unwrap().token(), "tok-1");
    }

    #[tokio::test]
    async fn sign_out_clears_memory_and_storage() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut session = SessionContext::new(Arc::clone(&repo) as Arc<dyn ProfileRepository>);
        session.sign_in(Credential::new("tok-1")).await.unwrap();
        session.sign_out().await;
        assert!(!session.is_signed_in());

        let restored = SessionContext::restore(repo).await.unwrap();
        assert!(!restored.is_signed_in());
    }
}
