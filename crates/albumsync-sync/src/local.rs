//! Local folder and file snapshots
//!
//! Folders and files are read fresh on every run and never modified by the
//! engine. Metadata reads go through `tokio::fs`.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::debug;

/// A directory taking part in the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFolder {
    path: PathBuf,
    name: String,
    created: SystemTime,
}

/// A regular file inside a [`LocalFolder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Matching key against remote entry titles
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Creation time, falling back to modification time where unsupported
fn creation_time(metadata: &std::fs::Metadata) -> SystemTime {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

impl LocalFolder {
    /// Reads the folder at `path`.
    ///
    /// # Errors
    /// Fails if `path` cannot be read or is not a directory.
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            name: display_name(path),
            created: creation_time(&metadata),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn created(&self) -> SystemTime {
        self.created
    }

    /// Whether a regular file called `file_name` exists directly inside
    pub async fn contains_file(&self, file_name: &str) -> bool {
        tokio::fs::metadata(self.path.join(file_name))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Regular files directly inside, in directory order
    pub async fn files(&self) -> std::io::Result<Vec<LocalFile>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Unreadable entry ignored");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push(LocalFile {
                name: display_name(&path),
                path,
                size: metadata.len(),
                modified: DateTime::<Utc>::from(modified),
            });
        }
        Ok(files)
    }

    /// Child folders ordered by ascending creation time, then name.
    ///
    /// Symbolic links to directories are not followed.
    pub async fn subfolders(&self) -> std::io::Result<Vec<LocalFolder>> {
        let mut folders = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let path = entry.path();
            let metadata = entry.metadata().await?;
            folders.push(LocalFolder {
                name: display_name(&path),
                created: creation_time(&metadata),
                path,
            });
        }
        folders.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.name.cmp(&b.name)));
        Ok(folders)
    }
}
