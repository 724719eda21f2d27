use aim_core::model::Session;
use async_trait::async_trait;

use crate::repository::{SessionStore, StorageError};

use super::SqliteRepository;
use super::local_store::{delete_value, read_value, write_value};
use super::mapping::{conn_err, ser};

pub const SESSION_KEY: &str = "aim_ai_session";

#[async_trait]
impl SessionStore for SqliteRepository {
    async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(conn_err)?;
        read_value(&mut *conn, SESSION_KEY)
            .await?
            .map(|raw| serde_json::from_str(&raw).map_err(ser))
            .transpose()
    }

    async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(session).map_err(ser)?;
        let mut conn = self.pool.acquire().await.map_err(conn_err)?;
        write_value(&mut *conn, SESSION_KEY, &encoded).await
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(conn_err)?;
        delete_value(&mut *conn, SESSION_KEY).await
    }
}
