use std::sync::Arc;

use aim_core::model::{CourseId, ModuleId, ProgressRecord, UserId};
use aim_core::time::{parse_rfc3339, to_rfc3339};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use crate::repository::{ProgressRepository, StorageError, TokenSource};

use super::RemoteConfig;

const TABLE_PATH: &str = "rest/v1/user_progress";
const CONFLICT_COLUMNS: &str = "user_id,course_id,module_id";
const SELECT_COLUMNS: &str = "course_id,module_id,completed_at";
const MAX_ERROR_BODY: usize = 200;

/// `user_progress` table accessed over PostgREST.
///
/// Idempotence comes from the table's composite key: writes are upserts on
/// `(user_id, course_id, module_id)`.
#[derive(Clone)]
pub struct RemoteProgressRepository {
    client: Client,
    config: RemoteConfig,
    tokens: Arc<dyn TokenSource>,
}

impl RemoteProgressRepository {
    #[must_use]
    pub fn new(config: RemoteConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client: Client::new(),
            config,
            tokens,
        }
    }

    /// Anonymous requests authenticate with the anon key itself.
    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .tokens
            .access_token()
            .await
            .unwrap_or_else(|| self.config.anon_key.clone());
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
    }
}

#[derive(Debug, Serialize)]
struct UpsertRow<'a> {
    user_id: &'a str,
    course_id: &'a str,
    module_id: &'a str,
    completed_at: String,
}

#[derive(Debug, Deserialize)]
struct ProgressRow {
    course_id: CourseId,
    module_id: ModuleId,
    #[serde(default)]
    completed_at: Option<String>,
}

fn transport(err: reqwest::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

async fn ensure_success(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|idx| message.is_char_boundary(*idx))
            .unwrap_or(0);
        message.truncate(cut);
    }
    Err(StorageError::Remote {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ProgressRepository for RemoteProgressRepository {
    async fn record_completion(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let row = UpsertRow {
            user_id: record.user_id.as_str(),
            course_id: record.course_id.as_str(),
            module_id: record.module_id.as_str(),
            completed_at: to_rfc3339(record.completed_at),
        };
        let request = self
            .client
            .post(self.config.endpoint(TABLE_PATH))
            .query(&[("on_conflict", CONFLICT_COLUMNS)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row);

        let response = self
            .authorized(request)
            .await
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let filter = format!("eq.{}", user_id.as_str());
        let request = self
            .client
            .get(self.config.endpoint(TABLE_PATH))
            .query(&[("select", SELECT_COLUMNS), ("user_id", filter.as_str())]);

        let response = self
            .authorized(request)
            .await
            .send()
            .await
            .map_err(transport)?;
        let rows: Vec<ProgressRow> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let completed_at = row
                    .completed_at
                    .as_deref()
                    .and_then(parse_rfc3339)
                    .unwrap_or_default();
                ProgressRecord::new(user_id.clone(), row.course_id, row.module_id, completed_at)
            })
            .collect())
    }
}
