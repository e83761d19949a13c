use std::sync::Arc;

use tracing::warn;

use lingo_core::model::Progress;
use storage::repository::{ProfileRepository, StorageError};

/// Owns the experience total and its durable copy.
///
/// The server is authoritative: `set_experience` replaces the total
/// unconditionally, there is no client-side accumulation. Level is always
/// derived from the total, never stored.
pub struct ProgressLedger {
    progress: Progress,
    profile: Arc<dyn ProfileRepository>,
}

impl ProgressLedger {
    /// A ledger starting at zero experience.
    #[must_use]
    pub fn new(profile: Arc<dyn ProfileRepository>) -> Self {
        Self {
            progress: Progress::default(),
            profile,
        }
    }

    /// Restore the experience total from durable storage at process start.
    /// A missing or unparsable stored value defaults to zero.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn restore(profile: Arc<dyn ProfileRepository>) -> Result<Self, StorageError> {
        let snapshot = profile.load_profile().await?;
        let experience = snapshot
            .experience
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);
        Ok(Self {
            progress: Progress::new(experience),
            profile,
        })
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn experience(&self) -> u32 {
        self.progress.experience()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    /// Replace the experience total with the server's value and persist it.
    ///
    /// A persistence failure is logged and does not roll back the in-memory
    /// total; the next successful write catches the store up.
    pub async fn set_experience(&mut self, total: u32) {
        self.progress = Progress::new(total);
        if let Err(err) = self.profile.save_experience(&total.to_string()).await {
            warn!(error = %err, total, "failed to persist experience total");
        }
    }

    /// Drop back to zero (sign-out). The stored entry is cleared by the
    /// session sign-out path alongside the credential.
    pub fn reset(&mut self) {
        self.progress = Progress::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, ProfileSnapshot};

    #[tokio::test]
    async fn set_experience_persists_and_restores() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut ledger = ProgressLedger::new(Arc::clone(&repo) as Arc<dyn ProfileRepository>);
        ledger.set_experience(450).await;
        assert_eq!(ledger.experience(), 450);
        assert_eq!(ledger.level(), 2);

        let restored = ProgressLedger::restore(repo).await.unwrap();
        assert_eq!(restored.experience(), 450);
        assert_eq!(restored.level(), 2);
    }

    #[tokio::test]
    async fn unparsable_stored_experience_defaults_to_zero() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.save_experience("not-a-number").await.unwrap();
        let ledger = ProgressLedger::restore(repo).await.unwrap();
        assert_eq!(ledger.experience(), 0);
        assert_eq!(ledger.level(), 1);
    }

    struct FailingStore;

    #[async_trait]
    impl ProfileRepository for FailingStore {
        async fn load_profile(&self) -> Result<ProfileSnapshot, StorageError> {
            Ok(ProfileSnapshot::default())
        }
        async fn save_credential(&self, _token: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
        async fn save_experience(&self, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
        async fn clear_profile(&self) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn persistence_failure_keeps_in_memory_total() {
        let mut ledger = ProgressLedger::new(Arc::new(FailingStore));
        ledger.set_experience(300).await;
        assert_eq!(ledger.experience(), 300);
        assert_eq!(ledger.level(), 2);
    }
}
