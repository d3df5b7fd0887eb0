//! Filesystem session store.

use crate::snapshot::{INTERRUPTED, SNAPSHOT_VERSION};
use crate::{
    FileSystemMediaStore, MediaStore, SceneSnapshot, SessionSnapshot, StoredSceneState,
};
use std::path::{Path, PathBuf};
use storyforge_core::{IdentityReference, Scene, SceneState, Storyboard};
use storyforge_error::{StorageError, StorageErrorKind, StoryforgeResult};
use storyforge_interface::{SessionStore, SessionSummary};
use uuid::Uuid;

/// Stores storyboards under a data directory.
///
/// ```text
/// {root}/
/// ├── media/                 content-addressed images
/// └── sessions/
///     └── {uuid}.json        one snapshot per storyboard
/// ```
///
/// Deleting a session removes only its snapshot; images may be shared with
/// other sessions and stay in the media store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    media: FileSystemMediaStore,
    sessions_dir: PathBuf,
}

impl FileSessionStore {
    /// Open a session store rooted at `root`, creating directories as needed.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> StoryforgeResult<Self> {
        let root = root.into();
        let media = FileSystemMediaStore::new(root.join("media"))?;
        let sessions_dir = root.join("sessions");

        std::fs::create_dir_all(&sessions_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                sessions_dir.display(),
                e
            )))
        })?;

        tracing::info!(path = %root.display(), "Opened session store");
        Ok(Self {
            media,
            sessions_dir,
        })
    }

    /// Underlying media store.
    pub fn media(&self) -> &FileSystemMediaStore {
        &self.media
    }

    fn snapshot_path(&self, id: Uuid) -> PathBuf {
        self.sessions_dir.join(format!("{}.json", id))
    }

    async fn snapshot_of(&self, storyboard: &Storyboard) -> StoryforgeResult<SessionSnapshot> {
        let identity_image = self.media.put(storyboard.identity().image()).await?;
        let anchor = match storyboard.anchor() {
            Some(image) => Some(self.media.put(image).await?),
            None => None,
        };

        let mut scenes = Vec::with_capacity(storyboard.len());
        for scene in storyboard.scenes() {
            let state = match scene.state() {
                SceneState::Pending => StoredSceneState::Pending,
                SceneState::Ready { prompt, image } => StoredSceneState::Ready {
                    prompt: prompt.clone(),
                    image: self.media.put(image).await?,
                },
                SceneState::Failed { prompt, reason } => StoredSceneState::Failed {
                    prompt: prompt.clone(),
                    reason: reason.clone(),
                },
                SceneState::Composing | SceneState::Generating { .. } => {
                    tracing::warn!(index = scene.index(), "Persisting in-flight scene as failed");
                    StoredSceneState::Failed {
                        prompt: scene.prompt().map(str::to_string),
                        reason: INTERRUPTED.to_string(),
                    }
                }
            };
            scenes.push(SceneSnapshot {
                index: *scene.index(),
                description: scene.description().clone(),
                state,
            });
        }

        Ok(SessionSnapshot {
            version: SNAPSHOT_VERSION,
            id: *storyboard.id(),
            created_at: *storyboard.created_at(),
            identity_image,
            identity_profile: storyboard.identity().profile().clone(),
            parameters: storyboard.parameters().clone(),
            scenes,
            anchor,
            strategy: storyboard.strategy().clone(),
        })
    }

    async fn read_snapshot(path: &Path) -> StoryforgeResult<SessionSnapshot> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let snapshot: SessionSnapshot = serde_json::from_str(&text).map_err(|e| {
            StorageError::new(StorageErrorKind::CorruptSnapshot(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StorageError::new(StorageErrorKind::CorruptSnapshot(format!(
                "{}: unsupported version {}",
                path.display(),
                snapshot.version
            )))
            .into());
        }
        Ok(snapshot)
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    #[tracing::instrument(skip(self, storyboard), fields(storyboard_id = %storyboard.id()))]
    async fn save(&self, storyboard: &Storyboard) -> StoryforgeResult<()> {
        let snapshot = self.snapshot_of(storyboard).await?;
        let json = serde_json::to_vec_pretty(&snapshot).map_err(|e| {
            StorageError::new(StorageErrorKind::CorruptSnapshot(e.to_string()))
        })?;

        let path = self.snapshot_path(snapshot.id);
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await.map_err(|e| {
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

        tracing::info!(path = %path.display(), "Saved session");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn load(&self, id: Uuid) -> StoryforgeResult<Storyboard> {
        let snapshot = Self::read_snapshot(&self.snapshot_path(id)).await?;

        let mut identity = IdentityReference::new(self.media.get(&snapshot.identity_image).await?);
        if let Some(profile) = snapshot.identity_profile {
            identity = identity.with_profile(profile);
        }

        let anchor = match &snapshot.anchor {
            Some(reference) => Some(self.media.get(reference).await?),
            None => None,
        };

        let mut scenes = Vec::with_capacity(snapshot.scenes.len());
        for stored in snapshot.scenes {
            let state = match stored.state {
                StoredSceneState::Pending => SceneState::Pending,
                StoredSceneState::Ready { prompt, image } => SceneState::Ready {
                    prompt,
                    image: self.media.get(&image).await?,
                },
                StoredSceneState::Failed { prompt, reason } => {
                    SceneState::Failed { prompt, reason }
                }
            };
            scenes.push(Scene::restore(stored.index, stored.description, state));
        }

        tracing::debug!(scenes = scenes.len(), "Loaded session");
        Ok(Storyboard::restore(
            snapshot.id,
            snapshot.created_at,
            identity,
            snapshot.parameters,
            scenes,
            anchor,
            snapshot.strategy,
        ))
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> StoryforgeResult<Vec<SessionSummary>> {
        let mut entries = tokio::fs::read_dir(&self.sessions_dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.sessions_dir.display(),
                e
            )))
        })?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.sessions_dir.display(),
                e
            )))
        })? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_snapshot(&path).await {
                Ok(snapshot) => summaries.push(SessionSummary::new(
                    snapshot.id,
                    snapshot.created_at,
                    snapshot.parameters.idea().clone(),
                    snapshot.scenes.len(),
                    snapshot.count_ready(),
                    snapshot.count_failed(),
                    snapshot.strategy.is_some(),
                )),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable session"),
            }
        }

        summaries.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(summaries)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> StoryforgeResult<()> {
        let path = self.snapshot_path(id);
        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileDelete(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        tracing::info!(path = %path.display(), "Deleted session");
        Ok(())
    }
}
