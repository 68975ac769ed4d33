use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Image quality used when importing server files.
const UPLOAD_IMAGE_QUALITY: u8 = 70;

/// Task as returned by task listings.
///
/// Known fields are typed; everything else the server sends is kept in
/// `extra` so arbitrary fields can still be displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub project_id: Option<i64>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    pub status: Option<String>,
    pub dimension: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Look up any field by its API name. Null counts as missing.
    pub fn field(&self, name: &str) -> Option<Value> {
        let value = serde_json::to_value(self).ok()?;
        value.get(name).filter(|v| !v.is_null()).cloned()
    }
}

/// Task creation result, merged over [`TaskRecord::defaults`].
///
/// Every key of the default record is present. A key the server sent wins,
/// including an explicit `null`; keys the server did not send keep the
/// default. Keys outside the default record are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TaskRecord(Map<String, Value>);

impl TaskRecord {
    /// The documented default task record, in display order.
    pub fn defaults() -> Map<String, Value> {
        let user = json!({
            "url": "http://example.com",
            "id": 0,
            "username": "^w$",
            "first_name": "string",
            "last_name": "string"
        });
        let storage = json!({
            "id": 0,
            "location": "cloud_storage",
            "cloud_storage_id": 0
        });
        let mut record = into_object(json!({
            "url": "http://example.com",
            "id": 0,
            "name": "string",
            "project_id": 0,
            "mode": "string",
            "owner": user.clone(),
            "assignee": user,
            "bug_tracker": "string",
            "created_date": "2019-08-24T14:15:22Z",
            "updated_date": "2019-08-24T14:15:22Z",
            "overlap": 0,
            "segment_size": 0,
            "status": "annotation",
            "data_chunk_size": 2147483647,
            "data_compressed_chunk_type": "video",
            "guide_id": 0
        }));
        record.extend(into_object(json!({
            "data_original_chunk_type": "video",
            "size": 2147483647,
            "image_quality": 32767,
            "data": 0,
            "dimension": "string",
            "subset": "string",
            "organization": 0,
            "target_storage": storage.clone(),
            "source_storage": storage,
            "jobs": {
                "count": 0,
                "completed": 0,
                "validation": 0,
                "url": "http://example.com"
            },
            "labels": {"url": "http://example.com"},
            "assignee_updated_date": "2019-08-24T14:15:22Z",
            "validation_mode": "string",
            "consensus_enabled": true
        })));
        record
    }

    pub fn from_response(response: &Map<String, Value>) -> Self {
        let mut record = Self::defaults();
        for (key, slot) in record.iter_mut() {
            if let Some(value) = response.get(key) {
                *slot = value.clone();
            }
        }
        Self(record)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Body for attaching server-side files to a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataUpload {
    pub server_files: Vec<String>,
    pub remote_files: Vec<String>,
    pub image_quality: u8,
    pub use_zip_chunks: bool,
    pub use_cache: bool,
    pub sorting_method: String,
    pub cloud_storage_id: i64,
}

impl DataUpload {
    pub fn server_files<P: AsRef<Path>>(files: &[P], cloud_storage_id: i64) -> Self {
        Self {
            server_files: files
                .iter()
                .map(|f| f.as_ref().to_string_lossy().into_owned())
                .collect(),
            remote_files: Vec::new(),
            image_quality: UPLOAD_IMAGE_QUALITY,
            use_zip_chunks: true,
            use_cache: true,
            sorting_method: "lexicographical".to_string(),
            cloud_storage_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_task_field_lookup() {
        let task: Task = serde_json::from_str(
            r#"{"id": 5, "name": "batch-1", "status": "annotation", "mode": "annotation", "assignee": null, "size": 12}"#,
        )
        .expect("parse task");
        assert_eq!(task.field("name"), Some(json!("batch-1")));
        assert_eq!(task.field("size"), Some(json!(12)));
        assert_eq!(task.field("assignee"), None);
        assert_eq!(task.field("missing"), None);
    }

    #[test]
    fn test_record_keeps_server_values() {
        let response = json!({"id": 42, "name": "road signs", "project_id": null, "unexpected": 1});
        let record = TaskRecord::from_response(response.as_object().expect("object"));

        assert_eq!(record.id(), Some(42));
        assert_eq!(record.get("name"), Some(&json!("road signs")));
        // Explicit null from the server is kept
        assert_eq!(record.get("project_id"), Some(&Value::Null));
        // Unknown keys are not part of the record
        assert_eq!(record.get("unexpected"), None);
    }

    #[test]
    fn test_record_fills_missing_fields() {
        let record = TaskRecord::from_response(&Map::new());
        assert_eq!(record.as_map().len(), TaskRecord::defaults().len());
        assert_eq!(record.get("status"), Some(&json!("annotation")));
        assert_eq!(record.get("data_chunk_size"), Some(&json!(2147483647)));
        assert_eq!(record.get("consensus_enabled"), Some(&json!(true)));
        assert_eq!(
            record.get("source_storage"),
            Some(&json!({"id": 0, "location": "cloud_storage", "cloud_storage_id": 0}))
        );
    }

    #[test]
    fn test_record_keeps_display_order() {
        let response = json!({"name": "road signs", "consensus_enabled": false, "id": 42});
        let record = TaskRecord::from_response(response.as_object().expect("object"));

        let keys: Vec<&str> = record.as_map().keys().map(String::as_str).collect();
        assert_eq!(&keys[..5], ["url", "id", "name", "project_id", "mode"]);
        assert_eq!(keys.last(), Some(&"consensus_enabled"));

        let printed = serde_json::to_string(&record).expect("serialize");
        let url_at = printed.find("\"url\"").expect("url key");
        let status_at = printed.find("\"status\"").expect("status key");
        let jobs_at = printed.find("\"jobs\"").expect("jobs key");
        assert!(url_at < status_at && status_at < jobs_at);
    }

    #[test]
    fn test_data_upload_body() {
        let upload = DataUpload::server_files(&[PathBuf::from("images/1.jpg")], 3);
        assert_eq!(
            serde_json::to_value(&upload).expect("serialize"),
            json!({
                "server_files": ["images/1.jpg"],
                "remote_files": [],
                "image_quality": 70,
                "use_zip_chunks": true,
                "use_cache": true,
                "sorting_method": "lexicographical",
                "cloud_storage_id": 3
            })
        );
    }
}
