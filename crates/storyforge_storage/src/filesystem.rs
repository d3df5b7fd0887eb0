//! Filesystem-backed media store.

use crate::{MediaReference, MediaStore};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use storyforge_core::MediaPayload;
use storyforge_error::{StorageError, StorageErrorKind, StoryforgeResult};

/// Content-addressed payloads on local disk.
///
/// Layout: `{base_path}/{hash[0:2]}/{hash[2:4]}/{hash}.{ext}`
///
/// ```text
/// ~/.local/share/storyforge/media/
/// ├── 3f/
/// │   └── a9/
/// │       └── 3fa9c1...e2.png   (identity reference)
/// └── b7/
///     └── 04/
///         └── b704d8...11.png   (anchor)
/// ```
///
/// Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSystemMediaStore {
    base_path: PathBuf,
}

impl FileSystemMediaStore {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> StoryforgeResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %base_path.display(), "Opened media store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Absolute path of a stored payload.
    pub fn resolve(&self, reference: &MediaReference) -> StoryforgeResult<PathBuf> {
        let relative = Path::new(&reference.storage_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(
                reference.storage_path.clone(),
            ))
            .into());
        }
        Ok(self.base_path.join(relative))
    }

    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn relative_path(hash: &str, extension: &str) -> PathBuf {
        PathBuf::from(&hash[0..2])
            .join(&hash[2..4])
            .join(format!("{}.{}", hash, extension))
    }
}

#[async_trait::async_trait]
impl MediaStore for FileSystemMediaStore {
    #[tracing::instrument(skip(self, payload), fields(size = payload.len(), mime = %payload.mime()))]
    async fn put(&self, payload: &MediaPayload) -> StoryforgeResult<MediaReference> {
        let hash = Self::compute_hash(payload.data());
        let relative = Self::relative_path(&hash, payload.extension());
        let path = self.base_path.join(&relative);

        let reference = MediaReference {
            content_hash: hash,
            storage_path: relative.to_string_lossy().to_string(),
            size_bytes: payload.len() as u64,
            mime_type: payload.mime().to_string(),
        };

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(hash = %reference.content_hash, "Payload already stored");
            return Ok(reference);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, payload.data())
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "{}: {}",
                    temp_path.display(),
                    e
                )))
            })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(
            hash = %reference.content_hash,
            path = %path.display(),
            "Stored payload"
        );
        Ok(reference)
    }

    #[tracing::instrument(skip(self, reference), fields(hash = %reference.content_hash))]
    async fn get(&self, reference: &MediaReference) -> StoryforgeResult<MediaPayload> {
        let path = self.resolve(reference)?;

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(reference.storage_path.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        if Self::compute_hash(&data) != reference.content_hash {
            return Err(StorageError::new(StorageErrorKind::HashMismatch(
                reference.storage_path.clone(),
            ))
            .into());
        }

        Ok(MediaPayload::new(reference.mime_type.clone(), data))
    }

    #[tracing::instrument(skip(self, reference), fields(hash = %reference.content_hash))]
    async fn remove(&self, reference: &MediaReference) -> StoryforgeResult<()> {
        let path = self.resolve(reference)?;

        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(reference.storage_path.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileDelete(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %path.display(), "Removed payload");
        Ok(())
    }

    async fn contains(&self, reference: &MediaReference) -> StoryforgeResult<bool> {
        let path = self.resolve(reference)?;
        Ok(tokio::fs::try_exists(path).await.unwrap_or(false))
    }
}
