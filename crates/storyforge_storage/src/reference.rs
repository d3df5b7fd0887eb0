//! Media reference types.

use serde::{Deserialize, Serialize};

/// Pointer to a stored payload.
///
/// `storage_path` is relative to the store's base directory so a data directory
/// can be moved as a whole.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MediaReference {
    /// SHA-256 hash of the content
    pub content_hash: String,
    /// Path of the payload relative to the store root
    pub storage_path: String,
    /// Size of the payload in bytes
    pub size_bytes: u64,
    /// MIME type
    pub mime_type: String,
}
