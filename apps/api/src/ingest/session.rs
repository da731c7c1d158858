use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::template::ResolutionKind;
use crate::models::trainee::TraineeRecord;

/// Staged uploads and their batch results expire after two hours.
pub const SESSION_TTL_SECS: u64 = 2 * 60 * 60;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("corrupt session payload: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagedStatus {
    #[serde(rename = "nuevo")]
    New,
    #[serde(rename = "existente")]
    Existing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedTrainee {
    /// Database id; `None` when the row could not be persisted.
    pub id: Option<i32>,
    #[serde(flatten)]
    pub record: TraineeRecord,
    pub status: StagedStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSession {
    pub upload_id: Uuid,
    pub file_name: String,
    pub kind: ResolutionKind,
    pub bulk_upload_id: Option<i32>,
    pub trainees: Vec<StagedTrainee>,
    pub row_errors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UploadSession {
    /// Staged trainees whose database id or document number is in `selected`,
    /// in upload order.
    pub fn select(&self, selected: &[String]) -> Vec<&StagedTrainee> {
        self.trainees
            .iter()
            .filter(|staged| {
                selected.iter().any(|key| {
                    let key = key.trim();
                    key == staged.record.document_number
                        || staged.id.is_some_and(|id| key == id.to_string())
                })
            })
            .collect()
    }
}

/// Redis-backed staging area keyed by upload id.
#[derive(Clone)]
pub struct SessionStore {
    client: redis::Client,
}

impl SessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub async fn save(&self, session: &UploadSession) -> Result<(), SessionError> {
        self.put(&session_key(&session.upload_id), session).await
    }

    pub async fn load(&self, upload_id: &Uuid) -> Result<Option<UploadSession>, SessionError> {
        self.fetch(&session_key(upload_id)).await
    }

    pub async fn save_results<T: Serialize>(
        &self,
        upload_id: &Uuid,
        results: &T,
    ) -> Result<(), SessionError> {
        self.put(&results_key(upload_id), results).await
    }

    pub async fn load_results<T: DeserializeOwned>(
        &self,
        upload_id: &Uuid,
    ) -> Result<Option<T>, SessionError> {
        self.fetch(&results_key(upload_id)).await
    }

    async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key, payload, SESSION_TTL_SECS).await?;
        debug!("Stored {key} (ttl {SESSION_TTL_SECS}s)");
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(key).await?;
        payload
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(SessionError::from)
    }
}

pub fn session_key(upload_id: &Uuid) -> String {
    format!("upload:{upload_id}")
}

pub fn results_key(upload_id: &Uuid) -> String {
    format!("upload:{upload_id}:results")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(id: Option<i32>, document_number: &str) -> StagedTrainee {
        StagedTrainee {
            id,
            record: TraineeRecord {
                document_type: "CC".to_string(),
                document_number: document_number.to_string(),
                given_names: "ANA".to_string(),
                family_names: "LOPEZ".to_string(),
                program: "X".to_string(),
                cohort_code: "1".to_string(),
                birth_date: None,
                phone: None,
                email: None,
            },
            status: StagedStatus::New,
        }
    }

    fn session() -> UploadSession {
        UploadSession {
            upload_id: Uuid::nil(),
            file_name: "aprendices.csv".to_string(),
            kind: ResolutionKind::Transport,
            bulk_upload_id: Some(7),
            trainees: vec![
                staged(Some(10), "111"),
                staged(None, "222"),
                staged(Some(12), "333"),
            ],
            row_errors: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_select_by_id_or_document_keeps_upload_order() {
        let session = session();
        let picked = session.select(&["333".to_string(), " 10 ".to_string(), "222".to_string()]);
        let docs: Vec<_> = picked.iter().map(|s| s.record.document_number.as_str()).collect();
        assert_eq!(docs, vec!["111", "222", "333"]);

        assert!(session.select(&["999".to_string()]).is_empty());
        assert!(session.select(&[]).is_empty());
    }

    #[test]
    fn test_session_json_shape() {
        let session = session();
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["kind"], "TRANSPORTE");
        assert_eq!(json["trainees"][0]["status"], "nuevo");
        assert_eq!(json["trainees"][0]["document_number"], "111");

        let back: UploadSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_keys() {
        let id = Uuid::nil();
        assert_eq!(session_key(&id), format!("upload:{id}"));
        assert_eq!(results_key(&id), format!("upload:{id}:results"));
    }
}
