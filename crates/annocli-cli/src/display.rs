//! Console rendering for API records.
//!
//! Every function builds a `String`; `main` decides where it goes.

use annocli_core::models::{
    CloudStorage, Label, Page, Project, StorageContent, StorageRef, Task, TaskRecord, UserRef,
};
use serde_json::Value;

use crate::utils::format::NOT_AVAILABLE;
use crate::utils::{capitalize, format_date, format_optional, format_value, truncate_string};

/// Width of section separators
const RULE_WIDTH: usize = 80;

/// Longest value shown for a single task field
const MAX_FIELD_WIDTH: usize = 100;

/// Line-at-a-time building of rendered output.
trait PushLine {
    fn push_line(&mut self, line: impl AsRef<str>);
}

impl PushLine for String {
    fn push_line(&mut self, line: impl AsRef<str>) {
        self.push_str(line.as_ref());
        self.push('\n');
    }
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn date(value: &Option<String>) -> String {
    value.as_deref().map(format_date).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn status(value: &Option<String>) -> String {
    capitalize(value.as_deref().unwrap_or(NOT_AVAILABLE))
}

fn user(value: &Option<UserRef>) -> String {
    value.as_ref().map(UserRef::display).unwrap_or_else(|| "None".to_string())
}

fn storage(value: &Option<StorageRef>) -> String {
    let storage = value.clone().unwrap_or_default();
    format!(
        "{} (Cloud ID: {})",
        format_optional(storage.id, "None"),
        format_optional(storage.cloud_storage_id, "None")
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn next_page<T>(out: &mut String, page: &Page<T>, what: &str) {
    if let Some(ref next) = page.next {
        out.push_line(format!("\nMore {} available: {}", what, next));
    }
}

// ===== Cloud Storage =====

pub fn render_cloud_storages(page: &Page<CloudStorage>) -> String {
    let mut out = String::new();
    out.push_line(format!("Cloud Storages ({} total)", page.count));
    out.push_line(rule());
    for storage in &page.results {
        out.push_line(format!(
            "{:<6} {:<30} {:<20} {}",
            storage.id,
            storage.display_name.as_deref().unwrap_or(NOT_AVAILABLE),
            storage.provider_type.as_deref().unwrap_or(NOT_AVAILABLE),
            storage.resource.as_deref().unwrap_or(NOT_AVAILABLE),
        ));
    }
    match page.results.first() {
        Some(first) => out.push_line(format!("\nSelected cloud storage ID: {}", first.id)),
        None => out.push_line("No cloud storages found"),
    }
    out
}

pub fn render_storage_content(content: &StorageContent) -> String {
    let mut out = String::new();
    let folders: Vec<_> = content.folders().collect();
    let files: Vec<_> = content.files().collect();

    if !folders.is_empty() {
        out.push_line("Folders");
        out.push_line("-".repeat(40));
        for folder in folders {
            out.push_line(format!("  {}/", folder.name));
        }
    }
    if !files.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_line("Files");
        out.push_line("-".repeat(40));
        for file in files {
            let mime = capitalize(file.mime_type.as_deref().unwrap_or("unknown"));
            out.push_line(format!("  {:<30} ({})", file.name, mime));
        }
    }
    if out.is_empty() {
        out.push_line("Storage is empty");
    }
    out
}

// ===== Projects =====

fn write_project_body(out: &mut String, project: &Project) {
    out.push_line(format!("Created Date   : {}", date(&project.created_date)));
    out.push_line(format!("Updated Date   : {}", date(&project.updated_date)));
    out.push_line(format!("Status         : {}", status(&project.status)));
    out.push_line(format!("Dimension      : {}", format_optional(project.dimension.as_deref(), "None")));

    out.push_line("\nStorage");
    out.push_line(format!("Source Storage ID : {}", storage(&project.source_storage)));
    out.push_line(format!("Target Storage ID : {}", storage(&project.target_storage)));

    let tasks = project.tasks.clone().unwrap_or_default();
    let labels = project.labels.clone().unwrap_or_default();
    out.push_line("\nTasks & Labels");
    out.push_line(format!("Total Tasks    : {}", format_optional(tasks.count, "None")));
    out.push_line(format!("Tasks URL      : {}", format_optional(tasks.url.as_deref(), "None")));
    out.push_line(format!("Labels URL     : {}", format_optional(labels.url.as_deref(), "None")));

    out.push_line("\nTask Subsets");
    if project.subsets().is_empty() {
        out.push_line("No task subsets available");
    } else {
        for subset in project.subsets() {
            out.push_line(format!("  {}", subset));
        }
    }
}

pub fn render_projects(page: &Page<Project>) -> String {
    let mut out = String::new();
    out.push_line("Projects");
    out.push_line(rule());
    out.push_line(format!("Total Projects Found: {}\n", page.count));
    for project in &page.results {
        out.push_line(format!("Project ID     : {}", format_optional(project.id, "None")));
        out.push_line(format!("Name           : {}", format_optional(project.name.as_deref(), "None")));
        out.push_line(format!("URL            : {}", format_optional(project.url.as_deref(), "None")));
        out.push_line(format!("Owner          : {}", user(&project.owner)));
        out.push_line(format!("Assignee       : {}", user(&project.assignee)));
        write_project_body(&mut out, project);
        out.push_line(rule());
    }
    next_page(&mut out, page, "projects");
    out
}

pub fn render_project(project: &Project) -> String {
    let mut out = String::new();
    out.push_line("Project Details");
    out.push_line(rule());
    out.push_line(format!("Project Name   : {}", format_optional(project.name.as_deref(), "None")));
    out.push_line(format!("Project URL    : {}", format_optional(project.url.as_deref(), "None")));
    out.push_line(format!("Project ID     : {}", format_optional(project.id, "None")));
    out.push_line(format!("Owner          : {}", user(&project.owner)));
    write_project_body(&mut out, project);
    out
}

// ===== Labels =====

fn write_label(out: &mut String, label: &Label, indent: &str, with_origin: bool) {
    out.push_line(format!("{}Label ID    : {}", indent, format_optional(label.id, NOT_AVAILABLE)));
    out.push_line(format!("{}Name        : {}", indent, format_optional(label.name.as_deref(), NOT_AVAILABLE)));
    out.push_line(format!("{}Color       : {}", indent, format_optional(label.color.as_deref(), NOT_AVAILABLE)));
    out.push_line(format!("{}Type        : {}", indent, format_optional(label.kind.as_deref(), NOT_AVAILABLE)));
    if with_origin {
        out.push_line(format!("{}Project ID  : {}", indent, format_optional(label.project_id, NOT_AVAILABLE)));
        out.push_line(format!("{}Task ID     : {}", indent, format_optional(label.task_id, NOT_AVAILABLE)));
    }
    out.push_line(format!("{}Has Parent? : {}", indent, yes_no(label.has_parent())));
}

fn write_labels(out: &mut String, labels: &[Label]) {
    for label in labels {
        write_label(out, label, "", true);
        if label.sublabels().is_empty() {
            out.push_line("  No sublabels available");
        } else {
            out.push_line("\n  Sublabels:");
            for sublabel in label.sublabels() {
                write_label(out, sublabel, "    ", false);
                out.push('\n');
            }
        }
        out.push_line(rule());
    }
}

pub fn render_labels(page: &Page<Label>) -> String {
    let mut out = String::new();
    out.push_line("Labels");
    out.push_line(rule());
    out.push_line(format!("Total Labels Found: {}\n", page.count));
    write_labels(&mut out, &page.results);
    next_page(&mut out, page, "labels");
    out
}

pub fn render_task_labels(task_id: i64, page: &Page<Label>) -> String {
    let mut out = String::new();
    if page.is_empty() {
        out.push_line(format!("No labels found for Task ID {}", task_id));
        return out;
    }
    out.push_line(format!("Labels for Task ID {}", task_id));
    out.push_line(rule());
    write_labels(&mut out, &page.results);
    out
}

// ===== Tasks =====

pub fn render_tasks(page: &Page<Task>, fields: &[String]) -> String {
    let mut out = String::new();
    out.push_line("Tasks");
    out.push_line(rule());
    out.push_line(format!("Total Tasks Found: {}\n", page.count));
    for task in &page.results {
        if fields.is_empty() {
            out.push_line(format!("Task ID     : {}", format_optional(task.id, NOT_AVAILABLE)));
            out.push_line(format!("Name        : {}", format_optional(task.name.as_deref(), NOT_AVAILABLE)));
            out.push_line(format!("Task URL    : {}", format_optional(task.url.as_deref(), NOT_AVAILABLE)));
            out.push_line(format!("Project ID  : {}", format_optional(task.project_id, NOT_AVAILABLE)));
            out.push_line(format!("Created     : {}", date(&task.created_date)));
            out.push_line(format!("Updated     : {}", date(&task.updated_date)));
            out.push_line(format!("Status      : {}", status(&task.status)));
            out.push_line(format!("Dimension   : {}", format_optional(task.dimension.as_deref(), NOT_AVAILABLE)));
        } else {
            for field in fields {
                let value = format_value(task.field(field).as_ref());
                out.push_line(format!(
                    "{} : {}",
                    capitalize(field),
                    truncate_string(&value, MAX_FIELD_WIDTH)
                ));
            }
        }
        out.push_line(rule());
    }
    next_page(&mut out, page, "tasks");
    out
}

pub fn render_created_task(record: &TaskRecord) -> String {
    let body = serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string());
    format!("Task Created Successfully\n{}\n", body)
}

pub fn render_upload_result(task_id: i64, response: &Value) -> String {
    let body = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
    format!("Images Added to Task {} Successfully\n{}\n", task_id, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page<T: serde::de::DeserializeOwned>(value: Value) -> Page<T> {
        serde_json::from_value(value).expect("valid page")
    }

    #[test]
    fn test_render_projects_lists_fields_and_next_link() {
        let projects: Page<Project> = page(json!({
            "count": 2,
            "next": "https://host/api/projects?page=2",
            "results": [{
                "id": 1,
                "name": "Street scenes",
                "owner": {"id": 1, "username": "admin"},
                "status": "annotation",
                "task_subsets": ["train"]
            }]
        }));

        let out = render_projects(&projects);
        assert!(out.contains("Total Projects Found: 2"));
        assert!(out.contains("Name           : Street scenes"));
        assert!(out.contains("Owner          : admin (ID: 1)"));
        assert!(out.contains("Assignee       : None"));
        assert!(out.contains("Status         : Annotation"));
        assert!(out.contains("  train"));
        assert!(out.contains("More projects available: https://host/api/projects?page=2"));
    }

    #[test]
    fn test_render_labels_with_sublabels() {
        let labels: Page<Label> = page(json!({
            "count": 1,
            "results": [{
                "id": 10,
                "name": "vehicle",
                "sublabels": [{"id": 11, "name": "car", "has_parent": true}]
            }]
        }));

        let out = render_labels(&labels);
        assert!(out.contains("Label ID    : 10"));
        assert!(out.contains("Color       : N/A"));
        assert!(out.contains("  Sublabels:"));
        assert!(out.contains("    Name        : car"));
        assert!(out.contains("    Has Parent? : Yes"));
    }

    #[test]
    fn test_render_task_labels_empty() {
        let labels: Page<Label> = page(json!({"count": 0, "results": []}));
        assert_eq!(render_task_labels(3, &labels), "No labels found for Task ID 3\n");
    }

    #[test]
    fn test_render_tasks_selected_fields() {
        let tasks: Page<Task> = page(json!({
            "count": 1,
            "results": [{"id": 5, "name": "batch-1", "mode": "annotation"}]
        }));

        let out = render_tasks(&tasks, &["name".to_string(), "mode".to_string(), "size".to_string()]);
        assert!(out.contains("Name : batch-1"));
        assert!(out.contains("Mode : annotation"));
        assert!(out.contains("Size : N/A"));
        assert!(!out.contains("Task URL"));
    }

    #[test]
    fn test_render_storage_content_sections() {
        let content: StorageContent = serde_json::from_value(json!({
            "content": [
                {"name": "images", "type": "DIR"},
                {"name": "1.jpg", "type": "REG", "mime_type": "image"}
            ]
        }))
        .expect("valid content");

        let out = render_storage_content(&content);
        let folders_at = out.find("Folders").expect("folders section");
        let files_at = out.find("Files").expect("files section");
        assert!(folders_at < files_at);
        assert!(out.contains("  images/"));
        assert!(out.contains("(Image)"));
    }

    #[test]
    fn test_render_cloud_storages_selects_first() {
        let storages: Page<CloudStorage> = page(json!({
            "count": 2,
            "results": [{"id": 4, "display_name": "a"}, {"id": 9, "display_name": "b"}]
        }));
        assert!(render_cloud_storages(&storages).contains("Selected cloud storage ID: 4"));
    }

    #[test]
    fn test_render_created_task_keeps_field_order() {
        let response = json!({"status": "completed", "id": 9, "name": "batch-9"});
        let record = TaskRecord::from_response(response.as_object().expect("object"));
        let out = render_created_task(&record);

        assert!(out.starts_with("Task Created Successfully\n{"));
        let positions: Vec<usize> = ["\"url\"", "\"id\"", "\"name\"", "\"status\"", "\"consensus_enabled\""]
            .iter()
            .map(|key| out.find(key).expect("key printed"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(out.contains("\"status\": \"completed\""));
    }
}
