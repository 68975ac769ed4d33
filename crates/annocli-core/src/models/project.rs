use serde::{Deserialize, Serialize};

/// Compact user reference embedded in projects and tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Option<i64>,
    pub username: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserRef {
    /// `name (ID: n)`, with `None` standing in for missing parts.
    pub fn display(&self) -> String {
        format!(
            "{} (ID: {})",
            self.username.as_deref().unwrap_or("None"),
            self.id.map(|id| id.to_string()).unwrap_or_else(|| "None".to_string())
        )
    }
}

/// Source or target storage attached to a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageRef {
    pub id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub cloud_storage_id: Option<i64>,
}

/// Link to a related collection, optionally with its size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub owner: Option<UserRef>,
    pub assignee: Option<UserRef>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    pub status: Option<String>,
    pub dimension: Option<String>,
    pub source_storage: Option<StorageRef>,
    pub target_storage: Option<StorageRef>,
    pub tasks: Option<Link>,
    pub labels: Option<Link>,
    pub task_subsets: Option<Vec<String>>,
}

impl Project {
    pub fn subsets(&self) -> &[String] {
        self.task_subsets.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project() {
        let json = r#"{
            "url": "https://host/api/projects/1",
            "id": 1,
            "name": "Street scenes",
            "owner": {"url": "https://host/api/users/1", "id": 1, "username": "admin", "first_name": "", "last_name": ""},
            "assignee": null,
            "created_date": "2025-02-10T09:12:00.000000Z",
            "updated_date": "2025-02-11T10:00:00.000000Z",
            "status": "annotation",
            "dimension": "2d",
            "source_storage": {"id": 3, "location": "cloud_storage", "cloud_storage_id": 1},
            "target_storage": {"id": 4, "location": "local", "cloud_storage_id": null},
            "tasks": {"count": 2, "url": "https://host/api/tasks?project_id=1"},
            "labels": {"url": "https://host/api/labels?project_id=1"},
            "task_subsets": ["train", "val"]
        }"#;

        let project: Project = serde_json::from_str(json).expect("parse project");
        assert_eq!(project.id, Some(1));
        assert_eq!(project.owner.as_ref().map(UserRef::display).as_deref(), Some("admin (ID: 1)"));
        assert!(project.assignee.is_none());
        assert_eq!(project.source_storage.as_ref().and_then(|s| s.cloud_storage_id), Some(1));
        assert_eq!(project.target_storage.as_ref().and_then(|s| s.cloud_storage_id), None);
        assert_eq!(project.tasks.as_ref().and_then(|t| t.count), Some(2));
        assert_eq!(project.subsets(), ["train".to_string(), "val".to_string()]);
    }

    #[test]
    fn test_parse_sparse_project() {
        let project: Project = serde_json::from_str(r#"{"id": 7, "task_subsets": null}"#).expect("parse");
        assert_eq!(project.id, Some(7));
        assert!(project.subsets().is_empty());
        assert!(project.owner.is_none());
    }

    #[test]
    fn test_user_ref_display_missing_parts() {
        assert_eq!(UserRef::default().display(), "None (ID: None)");
    }
}
