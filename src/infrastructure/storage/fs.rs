use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::errors::AppError;
use crate::repositories::payload::PayloadStore;

/// Payload store backed by a flat directory: one file per image, named by
/// an opaque UUID locator. The locator is the only link to the metadata row.
#[derive(Debug, Clone)]
pub struct FsPayloadStore {
    base_dir: PathBuf,
}

impl FsPayloadStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FsPayloadStore {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Joins a locator onto the base directory, refusing anything that
    /// could escape it. Locators are generated here, so a malformed one
    /// means corrupted state, not caller fault.
    fn locator_path(&self, locator: &str) -> Result<PathBuf, AppError> {
        let escapes = locator.is_empty()
            || locator == "."
            || locator == ".."
            || locator.contains('/')
            || locator.contains('\\');
        if escapes {
            return Err(AppError::InternalError(format!(
                "Malformed payload locator: {locator}"
            )));
        }
        Ok(self.base_dir.join(locator))
    }

    /// File names of payloads whose last modification is at least `min_age`
    /// old. The age gate keeps in-flight uploads out of the sweep.
    pub async fn stale_locators(&self, min_age: Duration) -> Result<Vec<String>, AppError> {
        let mut stale = Vec::new();
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            // Nothing uploaded yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stale),
            Err(e) => return Err(AppError::from(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let age = metadata
                .modified()?
                .elapsed()
                .unwrap_or_default();
            if age >= min_age {
                stale.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        Ok(stale)
    }

    /// Removes a payload file. Already-gone files are fine; the sweep may
    /// race a concurrent manual cleanup.
    pub async fn remove(&self, locator: &str) -> Result<(), AppError> {
        let path = self.locator_path(locator)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::from(e)),
        }
    }
}

#[async_trait]
impl PayloadStore for FsPayloadStore {
    async fn put(&self, data: &[u8]) -> Result<String, AppError> {
        fs::create_dir_all(&self.base_dir).await?;

        let locator = Uuid::new_v4().to_string();
        let path = self.base_dir.join(&locator);

        // create_new: a locator is never reused, so an existing file is a
        // hard error rather than something to overwrite.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(data).await?;
        file.sync_all().await?;

        Ok(locator)
    }

    async fn get(&self, locator: &str) -> Result<Vec<u8>, AppError> {
        let path = self.locator_path(locator)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Payload {locator} not found")))
            }
            Err(e) => Err(AppError::from(e)),
        }
    }
}
