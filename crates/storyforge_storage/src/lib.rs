//! Content-addressable image storage and session persistence for Storyforge.
//!
//! Image bytes live in a [`MediaStore`], addressed by their SHA-256 hash so the
//! identity reference and an anchor shared by many snapshots are written once.
//! [`FileSessionStore`] writes one JSON snapshot per storyboard that points at
//! those images by [`MediaReference`].
//!
//! # Example
//!
//! ```rust
//! use storyforge_core::MediaPayload;
//! use storyforge_storage::{FileSystemMediaStore, MediaStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemMediaStore::new("/tmp/storyforge-media")?;
//! let image = MediaPayload::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
//!
//! let reference = store.put(&image).await?;
//! let back = store.get(&reference).await?;
//! assert_eq!(back, image);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod reference;
mod session;
mod snapshot;
mod store;

pub use filesystem::FileSystemMediaStore;
pub use reference::MediaReference;
pub use session::FileSessionStore;
pub use snapshot::{SceneSnapshot, SessionSnapshot, StoredSceneState};
pub use store::MediaStore;
pub use storyforge_error::{StorageError, StorageErrorKind};
