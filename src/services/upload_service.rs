//! Uploaded image files and the orphan sweep.
//!
//! Files live flat in `<PUBLIC_DIR>/uploads` and are referenced by URL
//! (`/uploads/<name>`) from the site settings. Removing a reference never
//! deletes the file; `sweep` does that for every unreferenced file.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::upload::{
    MAX_UPLOAD_BYTES, OrphanFile, OrphanPreview, SweepReport, UPLOAD_URL_PREFIX, extension_for,
};

pub struct UploadDir {
    dir: PathBuf,
}

impl UploadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Store an image and return its public URL.
    ///
    /// # Errors
    ///
    /// - `FileTooLarge`: empty or over [`MAX_UPLOAD_BYTES`]
    /// - `BadType`: MIME type outside jpeg/png/webp
    pub async fn save(&self, bytes: &[u8], mime: &str) -> Result<String, AppError> {
        if bytes.is_empty() || bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::FileTooLarge);
        }
        let ext = extension_for(mime).ok_or(AppError::BadType)?;

        let suffix: [u8; 6] = rand::random();
        let name = format!(
            "upload-{}-{}.{ext}",
            chrono::Utc::now().timestamp_millis(),
            hex::encode(suffix)
        );

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        tracing::info!(file = %name, size = bytes.len(), "upload stored");
        Ok(format!("{UPLOAD_URL_PREFIX}{name}"))
    }

    /// Delete the file behind an upload URL. A file that is already gone
    /// counts as deleted.
    ///
    /// # Errors
    ///
    /// - `BadUrl`: not `/uploads/<plain file name>`
    /// - `DeleteFailed`: the file exists but could not be removed
    pub async fn delete(&self, url: &str) -> Result<(), AppError> {
        let name = url
            .strip_prefix(UPLOAD_URL_PREFIX)
            .filter(|name| is_plain_file_name(name))
            .ok_or(AppError::BadUrl)?;

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                tracing::info!(file = %name, "upload deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!(file = %name, error = %e, "failed to delete upload");
                Err(AppError::DeleteFailed)
            }
        }
    }

    /// Regular, non-hidden files in the directory, sorted by name.
    pub async fn list_files(&self) -> Result<Vec<String>, AppError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn orphans(&self, used: &HashSet<String>) -> Result<(usize, Vec<OrphanFile>), AppError> {
        let files = self.list_files().await?;
        let total = files.len();
        let orphans = files
            .into_iter()
            .map(|name| OrphanFile {
                url: format!("{UPLOAD_URL_PREFIX}{name}"),
                name,
            })
            .filter(|file| !used.contains(&file.url))
            .collect();
        Ok((total, orphans))
    }

    /// What `sweep` would delete, without deleting anything.
    pub async fn preview(&self, used: &HashSet<String>) -> Result<OrphanPreview, AppError> {
        let (total_files, orphans) = self.orphans(used).await?;
        Ok(OrphanPreview {
            used_count: used.len(),
            total_files,
            orphan_count: orphans.len(),
            orphans,
        })
    }

    /// Delete every file not in `used`.
    ///
    /// A failed removal is recorded in `failed` and the sweep moves on.
    pub async fn sweep(&self, used: &HashSet<String>) -> Result<SweepReport, AppError> {
        let (total_files, orphans) = self.orphans(used).await?;
        let (deleted, failed) = self.remove_orphans(&orphans).await;

        tracing::info!(deleted, failed = failed.len(), "upload sweep finished");
        Ok(SweepReport {
            used_count: used.len(),
            total_files,
            orphan_count: orphans.len(),
            deleted,
            failed,
        })
    }

    /// Remove each orphan, returning the number removed and the URLs that
    /// could not be. A file that vanished in the meantime is neither.
    async fn remove_orphans(&self, orphans: &[OrphanFile]) -> (usize, Vec<String>) {
        let mut deleted = 0;
        let mut failed = Vec::new();
        for orphan in orphans {
            match tokio::fs::remove_file(self.dir.join(&orphan.name)).await {
                Ok(()) => deleted += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(file = %orphan.name, error = %e, "orphan removal failed");
                    failed.push(orphan.url.clone());
                }
            }
        }
        (deleted, failed)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
}
