use serde::{Deserialize, Serialize};

/// A cloud storage attached to the server (S3 bucket, Azure container, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudStorage {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub provider_type: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
}

/// One level of a cloud storage listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageContent {
    pub content: Vec<StorageEntry>,
    #[serde(default)]
    pub next: Option<String>,
}

impl StorageContent {
    pub fn folders(&self) -> impl Iterator<Item = &StorageEntry> {
        self.content.iter().filter(|e| e.is_dir())
    }

    pub fn files(&self) -> impl Iterator<Item = &StorageEntry> {
        self.content.iter().filter(|e| !e.is_dir())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl StorageEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == "DIR"
    }
}
