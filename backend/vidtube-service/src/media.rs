//! Blob-storage collaborator interface.
//!
//! Uploads return a stable external id plus a serving URL; deletion is keyed
//! on that id. The real driver lives with the embedding binary; the service
//! only depends on this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),
}

/// What kind of asset is being stored. Some backends route video binaries to
/// a different resource class than images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
}

/// A stored blob: the external id used for later deletion plus the URL
/// clients fetch it from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub public_id: String,
    pub url: String,
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Upload a staged local file, returning its external id and URL.
    async fn upload(&self, local_path: &Path, kind: MediaKind) -> Result<MediaAsset, MediaError>;

    /// Delete a previously uploaded asset.
    async fn delete(&self, public_id: &str, kind: MediaKind) -> Result<(), MediaError>;
}
