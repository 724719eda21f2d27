use aim_core::model::{CourseId, ModuleId, ProgressRecord, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn_err<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// One element of the JSON list kept under a user's progress key.
///
/// The user id is implied by the key, so it is not repeated per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocalCompletion {
    pub course_id: CourseId,
    pub module_id: ModuleId,
    pub completed_at: DateTime<Utc>,
}

impl LocalCompletion {
    pub(crate) fn from_record(record: &ProgressRecord) -> Self {
        Self {
            course_id: record.course_id.clone(),
            module_id: record.module_id.clone(),
            completed_at: record.completed_at,
        }
    }

    pub(crate) fn into_record(self, user_id: &UserId) -> ProgressRecord {
        ProgressRecord::new(
            user_id.clone(),
            self.course_id,
            self.module_id,
            self.completed_at,
        )
    }

    pub(crate) fn same_module(&self, record: &ProgressRecord) -> bool {
        self.course_id == record.course_id && self.module_id == record.module_id
    }
}

pub(crate) fn decode_completions(raw: Option<&str>) -> Result<Vec<LocalCompletion>, StorageError> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(ser),
    }
}

pub(crate) fn encode_completions(entries: &[LocalCompletion]) -> Result<String, StorageError> {
    serde_json::to_string(entries).map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::time::fixed_now;

    #[test]
    fn entries_use_camel_case_keys() {
        let entry = LocalCompletion {
            course_id: CourseId::new("c1"),
            module_id: ModuleId::new("m1-1"),
            completed_at: fixed_now(),
        };
        let json = encode_completions(&[entry]).unwrap();
        assert!(json.contains(r#""courseId":"c1""#));
        assert!(json.contains(r#""moduleId":"m1-1""#));
        assert!(json.contains(r#""completedAt":"2023-11-14T22:13:20Z""#));
    }

    #[test]
    fn missing_value_decodes_to_empty_list() {
        assert!(decode_completions(None).unwrap().is_empty());
        assert!(decode_completions(Some("")).unwrap().is_empty());
        assert!(matches!(
            decode_completions(Some("{not json")),
            Err(StorageError::Serialization(_))
        ));
    }
}
