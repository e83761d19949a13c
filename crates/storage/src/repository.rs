use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage keys for the locally persisted profile.
///
/// The durable profile is deliberately tiny: the bearer token and the
/// experience total as a decimal string. Everything else is owned by the
/// backend.
pub const KEY_CREDENTIAL: &str = "credential";
pub const KEY_EXPERIENCE: &str = "experience";

/// Raw persisted profile as read at startup.
///
/// Values are raw strings; interpretation (blank token means signed out,
/// unparsable experience means zero) happens in the services layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub credential: Option<String>,
    pub experience: Option<String>,
}

/// Repository contract for the durable local profile.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Read both profile entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn load_profile(&self) -> Result<ProfileSnapshot, StorageError>;

    /// Persist the credential token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn save_credential(&self, token: &str) -> Result<(), StorageError>;

    /// Persist the experience total as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn save_experience(&self, value: &str) -> Result<(), StorageError>;

    /// Remove both profile entries (sign-out).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_profile(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn load_profile(&self) -> Result<ProfileSnapshot, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(ProfileSnapshot {
            credential: guard.get(KEY_CREDENTIAL).cloned(),
            experience: guard.get(KEY_EXPERIENCE).cloned(),
        })
    }

    async fn save_credential(&self, token: &str) -> Result<(), StorageError> {
        self.set(KEY_CREDENTIAL, token)
    }

    async fn save_experience(&self, value: &str) -> Result<(), StorageError> {
        self.set(KEY_EXPERIENCE, value)
    }

    async fn clear_profile(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(KEY_CREDENTIAL);
        guard.remove(KEY_EXPERIENCE);
        Ok(())
    }
}

/// Aggregates the profile repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub profile: Arc<dyn ProfileRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let profile: Arc<dyn ProfileRepository> = Arc::new(repo);
        Self { profile }
    }
}
