use aim_core::model::{ProgressRecord, UserId};
use async_trait::async_trait;

use crate::repository::{ProgressRepository, StorageError};

use super::SqliteRepository;
use super::local_store::{read_value, write_value};
use super::mapping::{LocalCompletion, conn_err, decode_completions, encode_completions};

/// Local store key holding a user's completion list.
#[must_use]
pub fn progress_key(user_id: &UserId) -> String {
    format!("aim_ai_progress_{}", user_id.as_str())
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn record_completion(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let key = progress_key(&record.user_id);
        let mut tx = self.pool.begin().await.map_err(conn_err)?;

        let raw = read_value(&mut *tx, &key).await?;
        let mut entries = decode_completions(raw.as_deref())?;
        if entries.iter().any(|entry| entry.same_module(record)) {
            return Ok(());
        }

        entries.push(LocalCompletion::from_record(record));
        let encoded = encode_completions(&entries)?;
        write_value(&mut *tx, &key, &encoded).await?;

        tx.commit().await.map_err(conn_err)?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(conn_err)?;
        let raw = read_value(&mut *conn, &progress_key(user_id)).await?;
        Ok(decode_completions(raw.as_deref())?
            .into_iter()
            .map(|entry| entry.into_record(user_id))
            .collect())
    }
}
