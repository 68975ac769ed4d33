use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// On-disk shape of the token cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
}

/// Best-effort file cache for the last known bearer token.
///
/// None of the operations fail: an unreadable cache is a cache miss, and a
/// cache that cannot be written only costs a login on the next run.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached token, if there is a usable one.
    pub fn load(&self) -> Option<String> {
        match self.read_record() {
            Ok(Some(record)) if super::is_sendable(&record.token) => {
                info!(path = %self.path.display(), "Using stored token");
                Some(record.token)
            }
            Ok(Some(record)) if !record.token.is_empty() => {
                warn!(path = %self.path.display(), "Ignoring stored token that cannot be sent as a header");
                None
            }
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %format!("{:#}", e), "Ignoring unreadable token cache");
                None
            }
        }
    }

    /// Replace the cached token.
    pub fn save(&self, token: &str) {
        if let Err(e) = self.write_record(&TokenRecord { token: token.to_string() }) {
            warn!(path = %self.path.display(), error = %format!("{:#}", e), "Failed to save token");
        }
    }

    /// Remove the cached token. Missing files are fine.
    pub fn delete(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "Expired token deleted"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to delete token"),
        }
    }

    fn read_record(&self) -> Result<Option<TokenRecord>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to read token file"),
        };
        let record: TokenRecord =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(record))
    }

    /// Write to a sibling temp file, then rename over the target so readers
    /// never observe a half-written record.
    fn write_record(&self, record: &TokenRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create token directory")?;
        }

        let tmp = self.tmp_path();
        let contents = serde_json::to_string(record)?;
        let mut file = create_private(&tmp).context("Failed to create temporary token file")?;

        // A leftover temp file keeps its old mode, so tighten it explicitly
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            if let Err(e) = file.set_permissions(perms) {
                warn!(path = %tmp.display(), error = %e, "Failed to restrict token file permissions");
            }
        }

        file.write_all(contents.as_bytes())
            .context("Failed to write temporary token file")?;
        drop(file);

        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e).context("Failed to move token file into place");
        }
        debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "token.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Open `path` for writing, created owner-only on Unix.
#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
