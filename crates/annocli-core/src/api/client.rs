//! Typed endpoints of the annotation server.
//!
//! `AnnotationClient` only knows paths and payload shapes; authentication and
//! the 401 retry live in the session underneath.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::models::{
    CloudStorage, DataUpload, Label, LabelQuery, Page, Project, StorageContent, Task, TaskRecord,
};

use super::{ApiError, AuthenticatedSession};

/// Prefix used when browsing a cloud storage from its root.
pub const ROOT_PREFIX: &str = "/";

pub struct AnnotationClient {
    session: AuthenticatedSession,
}

impl AnnotationClient {
    pub fn new(session: AuthenticatedSession) -> Self {
        Self { session }
    }

    /// Connect a session from configuration and wrap it.
    pub async fn connect(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(AuthenticatedSession::connect(config).await?))
    }

    pub fn session(&self) -> &AuthenticatedSession {
        &self.session
    }

    // ===== Cloud Storage =====

    pub async fn cloud_storages(&self, page_size: u32) -> Result<Page<CloudStorage>, ApiError> {
        let params = [("page_size", page_size.to_string())];
        self.session.get("/api/cloudstorages", &params).await
    }

    /// Id of the first cloud storage the server lists, if any.
    pub async fn first_cloud_storage_id(&self) -> Result<Option<i64>, ApiError> {
        let page = self.cloud_storages(10).await?;
        let id = page.results.first().map(|s| s.id);
        match id {
            Some(id) => info!(cloud_storage_id = id, "Cloud storages fetched"),
            None => error!("No cloud storage configured on the server"),
        }
        Ok(id)
    }

    pub async fn cloud_storage_content(
        &self,
        storage_id: i64,
        prefix: &str,
    ) -> Result<StorageContent, ApiError> {
        let endpoint = format!("/api/cloudstorages/{}/content-v2", storage_id);
        let params = [("org", String::new()), ("prefix", prefix.to_string())];
        self.session.get(&endpoint, &params).await
    }

    // ===== Projects =====

    pub async fn projects(&self) -> Result<Page<Project>, ApiError> {
        self.session.get("/api/projects", &[]).await
    }

    pub async fn project(&self, project_id: i64) -> Result<Project, ApiError> {
        self.session
            .get(&format!("/api/projects/{}", project_id), &[])
            .await
    }

    // ===== Labels =====

    pub async fn labels(&self, query: &LabelQuery) -> Result<Page<Label>, ApiError> {
        self.session.get("/api/labels", &query.to_params()).await
    }

    pub async fn task_labels(&self, task_id: i64) -> Result<Page<Label>, ApiError> {
        let params = [("task_id", task_id.to_string())];
        self.session.get("/api/labels", &params).await
    }

    // ===== Tasks =====

    /// List tasks with arbitrary query filters (`project_id`, `name`, `page`, ...).
    pub async fn tasks(&self, filters: &[(String, String)]) -> Result<Page<Task>, ApiError> {
        let params: Vec<(&str, String)> = filters
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        self.session.get("/api/tasks", &params).await
    }

    /// Create a task from a JSON definition and merge the response over the
    /// default task record.
    pub async fn create_task(&self, definition: &Value) -> Result<TaskRecord, ApiError> {
        let response: Value = self.session.post("/api/tasks", definition).await?;
        let fields = response.as_object().ok_or_else(|| {
            ApiError::InvalidResponse("Task creation response is not a JSON object".to_string())
        })?;
        let record = TaskRecord::from_response(fields);
        info!(task_id = ?record.id(), "Task created");
        Ok(record)
    }

    /// Attach server-side files to a task. Every path must exist locally;
    /// nothing is sent otherwise.
    pub async fn upload_server_files(
        &self,
        task_id: i64,
        files: &[PathBuf],
        cloud_storage_id: i64,
    ) -> Result<Value, ApiError> {
        let missing: Vec<PathBuf> = files.iter().filter(|f| !f.exists()).cloned().collect();
        if !missing.is_empty() {
            error!(count = missing.len(), "Upload files not found");
            return Err(ApiError::MissingFiles(missing));
        }

        let body = DataUpload::server_files(files, cloud_storage_id);
        debug!(task_id = task_id, files = files.len(), "Uploading server files");
        self.session
            .post(&format!("/api/tasks/{}/data", task_id), &body)
            .await
    }
}
