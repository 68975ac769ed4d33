//! annocli - command line client for an annotation-platform REST API.
//!
//! Lists projects, tasks, labels and cloud storage contents, creates tasks and
//! attaches server files to them. The login token is cached on disk and
//! refreshed automatically when the server rejects it.

mod display;
mod utils;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use annocli_core::api::client::ROOT_PREFIX;
use annocli_core::models::LabelQuery;
use annocli_core::{AnnotationClient, ApiError, AuthenticatedSession, Config, TokenStore};

#[derive(Parser)]
#[command(name = "annocli")]
#[command(about = "Command line client for annotation-platform projects, tasks and labels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API root (overrides BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Token cache file (overrides TOKEN_FILE)
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and cache a fresh token
    Login,

    /// Delete the cached token
    Logout,

    /// List cloud storages
    Storages {
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// List the folders and files of a cloud storage
    StorageContent {
        /// Cloud storage id (defaults to the first listed storage)
        #[arg(long)]
        id: Option<i64>,

        #[arg(long, default_value = ROOT_PREFIX)]
        prefix: String,
    },

    /// List all projects
    Projects,

    /// Show one project
    Project { id: i64 },

    /// List the labels of a project
    Labels {
        #[arg(long)]
        project: i64,

        #[arg(long, default_value = "")]
        org: String,

        #[arg(long, default_value_t = 500)]
        page_size: u32,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List the labels of a task
    TaskLabels { task_id: i64 },

    /// List tasks
    Tasks {
        /// Query filter, repeatable (e.g. --filter project_id=2)
        #[arg(long = "filter", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,

        /// Only print these fields (comma separated)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Create a task from a JSON definition file
    CreateTask { file: PathBuf },

    /// Attach server files to a task
    Upload {
        task_id: i64,

        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, default_value_t = 1)]
        cloud_storage_id: i64,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing(debug: bool) {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn read_task_definition(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read task definition {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid JSON format in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = Config::from_env();
    if let Some(ref base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(token_file) = cli.token_file {
        config = config.with_token_path(token_file);
    }

    info!(base_url = %config.base_url, "annocli starting");
    run(cli.command, &config).await
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Login => {
            let session = AuthenticatedSession::new(config)?;
            session.reauthenticate().await?;
            println!("Logged in to {}", session.base_url());
        }
        Commands::Logout => {
            let store = TokenStore::new(config.token_path.clone());
            store.delete();
            println!("Token cache cleared ({})", store.path().display());
        }
        Commands::Storages { page_size } => {
            let client = AnnotationClient::connect(config).await?;
            let page = client.cloud_storages(page_size).await?;
            print!("{}", display::render_cloud_storages(&page));
        }
        Commands::StorageContent { id, prefix } => {
            let client = AnnotationClient::connect(config).await?;
            let storage_id = match id {
                Some(id) => id,
                None => match client.first_cloud_storage_id().await? {
                    Some(id) => id,
                    None => bail!("No cloud storage available; pass --id or configure one on the server"),
                },
            };
            let content = client.cloud_storage_content(storage_id, &prefix).await?;
            print!("{}", display::render_storage_content(&content));
        }
        Commands::Projects => {
            let client = AnnotationClient::connect(config).await?;
            let page = client.projects().await?;
            print!("{}", display::render_projects(&page));
        }
        Commands::Project { id } => {
            let client = AnnotationClient::connect(config).await?;
            let project = client.project(id).await?;
            print!("{}", display::render_project(&project));
        }
        Commands::Labels { project, org, page_size, page } => {
            let client = AnnotationClient::connect(config).await?;
            let query = LabelQuery {
                project_id: project,
                org,
                page_size,
                page,
            };
            let labels = client.labels(&query).await?;
            print!("{}", display::render_labels(&labels));
        }
        Commands::TaskLabels { task_id } => {
            let client = AnnotationClient::connect(config).await?;
            let labels = client.task_labels(task_id).await?;
            print!("{}", display::render_task_labels(task_id, &labels));
        }
        Commands::Tasks { filters, fields } => {
            let client = AnnotationClient::connect(config).await?;
            let tasks = client.tasks(&filters).await?;
            print!("{}", display::render_tasks(&tasks, &fields));
        }
        Commands::CreateTask { file } => {
            let definition = read_task_definition(&file)?;
            let client = AnnotationClient::connect(config).await?;
            let record = client.create_task(&definition).await?;
            print!("{}", display::render_created_task(&record));
        }
        Commands::Upload { task_id, files, cloud_storage_id } => {
            let client = AnnotationClient::connect(config).await?;
            match client.upload_server_files(task_id, &files, cloud_storage_id).await {
                Ok(response) => print!("{}", display::render_upload_result(task_id, &response)),
                Err(ApiError::MissingFiles(missing)) => {
                    eprintln!("The following files were not found:");
                    for path in &missing {
                        eprintln!("  {}", path.display());
                    }
                    eprintln!("Check that the file paths are correct.");
                    bail!("{} upload file(s) missing", missing.len());
                }
                Err(e) => {
                    if e.status().is_some_and(|s| s.is_server_error()) {
                        eprintln!("Server error - possible causes: invalid file paths, unsupported formats, or API issues.");
                    }
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("project_id=2"),
            Ok(("project_id".to_string(), "2".to_string()))
        );
        assert_eq!(
            parse_key_val("name=a=b"),
            Ok(("name".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_val("project_id").is_err());
        assert!(parse_key_val("=2").is_err());
    }

    #[test]
    fn test_cli_parses_tasks_command() {
        let cli = Cli::try_parse_from([
            "annocli", "tasks", "--filter", "project_id=2", "--fields", "id,name",
        ])
        .expect("valid arguments");
        match cli.command {
            Commands::Tasks { filters, fields } => {
                assert_eq!(filters, vec![("project_id".to_string(), "2".to_string())]);
                assert_eq!(fields, vec!["id".to_string(), "name".to_string()]);
            }
            _ => panic!("expected tasks command"),
        }
    }

    #[test]
    fn test_cli_upload_requires_files() {
        assert!(Cli::try_parse_from(["annocli", "upload", "5"]).is_err());
    }

    #[test]
    fn test_read_task_definition_errors() {
        let dir = tempfile::tempdir().expect("tempdir");

        let missing = dir.path().join("missing.json");
        let err = read_task_definition(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read task definition"));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, "{ not json").expect("write");
        let err = read_task_definition(&invalid).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON format"));

        let valid = dir.path().join("task.json");
        std::fs::write(&valid, r#"{"name": "batch-1", "project_id": 2}"#).expect("write");
        let definition = read_task_definition(&valid).expect("valid definition");
        assert_eq!(definition["name"], "batch-1");
    }
}
