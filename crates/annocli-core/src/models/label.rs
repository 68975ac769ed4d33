use serde::{Deserialize, Serialize};

/// Default page size for label listings.
/// Large enough to fetch a typical project's labels in one request.
const DEFAULT_LABEL_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
    pub has_parent: Option<bool>,
    pub sublabels: Option<Vec<Label>>,
}

impl Label {
    pub fn has_parent(&self) -> bool {
        self.has_parent.unwrap_or(false)
    }

    pub fn sublabels(&self) -> &[Label] {
        self.sublabels.as_deref().unwrap_or(&[])
    }
}

/// Filter for listing the labels of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelQuery {
    pub project_id: i64,
    pub org: String,
    pub page_size: u32,
    pub page: u32,
}

impl LabelQuery {
    pub fn for_project(project_id: i64) -> Self {
        Self {
            project_id,
            org: String::new(),
            page_size: DEFAULT_LABEL_PAGE_SIZE,
            page: 1,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("project_id", self.project_id.to_string()),
            ("org", self.org.clone()),
            ("page_size", self.page_size.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}
