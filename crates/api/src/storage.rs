//! Filesystem store for uploaded gym images. Files live under the
//! configured upload root, outside any routed path; the database records
//! the path relative to that root.

use eyre::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const GYM_IMAGE_SUBDIR: &str = "gyms";

/// Saves and deletes uploaded files under a fixed root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Writes the bytes under a unique name and returns the relative path
    /// recorded in the database.
    pub async fn save(&self, bytes: &[u8], name: &str) -> Result<String> {
        let dir = self.root.join(GYM_IMAGE_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;

        let relative = format!("{}/{}", GYM_IMAGE_SUBDIR, name);
        tokio::fs::write(dir.join(name), bytes).await?;

        Ok(relative)
    }

    /// Removes a previously saved file. Callers treat failures as
    /// best-effort cleanup.
    pub async fn delete(&self, relative: &str) -> Result<()> {
        tokio::fs::remove_file(self.root.join(relative)).await?;
        Ok(())
    }
}

/// Derives a unique stored name from the uploaded filename, keeping only
/// its extension.
pub fn unique_filename(original: &str) -> String {
    match extension(original) {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Lowercased extension of a filename, if it has one.
pub fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
