//! Upload store backed by a local directory.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::sanitize_filename;
use crate::{Result, UploadError};

/// Flat directory of uploaded files.
///
/// Files are stored under their sanitized client name. Saving a name that
/// already exists replaces its content; there is no locking, so concurrent
/// writers of the same name race and the last one to finish wins.
#[derive(Debug, Clone)]
pub struct UploadStore {
    /// Directory holding the uploaded files.
    base_path: PathBuf,
}

impl UploadStore {
    /// Open the store at `base_path`, creating the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Full path of a stored file.
    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }

    /// List the names of all regular files in the store, sorted ascending.
    ///
    /// Subdirectories and special files are skipped. Symlinks are followed.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut dir = fs::read_dir(&self.base_path).await?;
        let mut names = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let is_file = fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Save `content` under the sanitized form of `client_name`.
    ///
    /// Creates the file or truncates an existing one. The write is not
    /// atomic. Returns the name the file was stored under.
    pub async fn save(&self, client_name: &str, content: &[u8]) -> Result<String> {
        let stored_name = sanitize_filename(client_name).ok_or_else(|| {
            UploadError::Validation(format!("unusable filename: {client_name:?}"))
        })?;

        fs::write(self.path_for(&stored_name), content).await?;

        Ok(stored_name)
    }

    /// Load the content of a stored file.
    pub async fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        match fs::read(self.path_for(stored_name)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(UploadError::NotFound(format!("File: {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
