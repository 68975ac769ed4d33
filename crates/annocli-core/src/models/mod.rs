//! Data models for annotation-platform resources.
//!
//! - `Page`: the paginated listing envelope shared by every collection
//! - `Project`, `UserRef`, `StorageRef`: project records
//! - `Label`, `LabelQuery`: labels and their listing filter
//! - `Task`, `TaskRecord`, `DataUpload`: task listing, creation and data import
//! - `CloudStorage`, `StorageContent`: cloud storage browsing

pub mod label;
pub mod page;
pub mod project;
pub mod storage;
pub mod task;

pub use label::{Label, LabelQuery};
pub use page::Page;
pub use project::{Link, Project, StorageRef, UserRef};
pub use storage::{CloudStorage, StorageContent, StorageEntry};
pub use task::{DataUpload, Task, TaskRecord};
