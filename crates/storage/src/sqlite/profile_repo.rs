use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{
    KEY_CREDENTIAL, KEY_EXPERIENCE, ProfileRepository, ProfileSnapshot, StorageError,
};

use super::SqliteRepository;

impl SqliteRepository {
    async fn get_entry(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM profile WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        row.try_get("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn put_entry(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO profile (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for SqliteRepository {
    async fn load_profile(&self) -> Result<ProfileSnapshot, StorageError> {
        Ok(ProfileSnapshot {
            credential: self.get_entry(KEY_CREDENTIAL).await?,
            experience: self.get_entry(KEY_EXPERIENCE).await?,
        })
    }

    async fn save_credential(&self, token: &str) -> Result<(), StorageError> {
        self.put_entry(KEY_CREDENTIAL, token).await
    }

    async fn save_experience(&self, value: &str) -> Result<(), StorageError> {
        self.put_entry(KEY_EXPERIENCE, value).await
    }

    async fn clear_profile(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM profile WHERE key IN (?1, ?2)")
            .bind(KEY_CREDENTIAL)
            .bind(KEY_EXPERIENCE)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
