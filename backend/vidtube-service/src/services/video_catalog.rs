//! Video record operations: plain CRUD plus blob-storage plumbing.
//!
//! The caller identity is consumed for ownership checks only; all engagement
//! state on the video is owned by the engagement engine.

use std::path::Path;
use std::sync::Arc;

use record_store::{Video, VideoStore};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, Result};
use crate::media::{MediaKind, MediaStorage};

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct VideoUpload {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct VideoUpdate {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub tags: Vec<String>,
}

pub struct VideoCatalog<S, M> {
    store: Arc<S>,
    media: Arc<M>,
}

impl<S, M> VideoCatalog<S, M>
where
    S: VideoStore + Send + Sync,
    M: MediaStorage,
{
    pub fn new(store: Arc<S>, media: Arc<M>) -> Self {
        Self { store, media }
    }

    /// Upload both staged assets and create the video record.
    pub async fn publish(
        &self,
        owner_id: Uuid,
        upload: VideoUpload,
        video_path: &Path,
        thumbnail_path: &Path,
    ) -> Result<Video> {
        upload.validate()?;

        let video_asset = self.media.upload(video_path, MediaKind::Video).await?;
        let thumbnail = self.media.upload(thumbnail_path, MediaKind::Image).await?;

        let video = Video::new(
            owner_id,
            upload.title,
            upload.description,
            upload.category,
            upload.tags,
            video_asset.url,
            video_asset.public_id,
            thumbnail.url,
            thumbnail.public_id,
        );

        let created = self.store.insert_video(video).await?;
        tracing::info!(video_id = %created.id, %owner_id, "video published");
        Ok(created)
    }

    pub async fn get(&self, video_id: Uuid) -> Result<Video> {
        self.store
            .video(video_id)
            .await?
            .ok_or(ApiError::NotFound("video"))
    }

    pub async fn for_owner(&self, owner_id: Uuid) -> Result<Vec<Video>> {
        Ok(self.store.videos_by_owner(owner_id).await?)
    }

    /// Update the descriptive fields. Owner only.
    pub async fn update_details(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        update: VideoUpdate,
    ) -> Result<Video> {
        update.validate()?;

        let updated = self
            .store
            .update_video(video_id, move |video| {
                if video.owner_id != owner_id {
                    return Ok(None);
                }
                video.title = update.title;
                video.description = update.description;
                video.category = update.category;
                video.tags = update.tags;
                Ok(Some(video.clone()))
            })
            .await?;

        updated.ok_or_else(|| {
            ApiError::InvalidOperation("only the owner can update this video".to_string())
        })
    }

    /// Replace the thumbnail asset. The old blob is deleted best-effort; a
    /// stale blob in storage is preferable to a record pointing nowhere.
    pub async fn update_thumbnail(
        &self,
        owner_id: Uuid,
        video_id: Uuid,
        thumbnail_path: &Path,
    ) -> Result<Video> {
        let current = self.get(video_id).await?;
        if current.owner_id != owner_id {
            return Err(ApiError::InvalidOperation(
                "only the owner can update this video".to_string(),
            ));
        }

        let thumbnail = self.media.upload(thumbnail_path, MediaKind::Image).await?;

        if let Err(e) = self
            .media
            .delete(&current.thumbnail_id, MediaKind::Image)
            .await
        {
            tracing::warn!(%video_id, error = %e, "failed to delete replaced thumbnail");
        }

        let updated = self
            .store
            .update_video(video_id, move |video| {
                video.thumbnail_url = thumbnail.url;
                video.thumbnail_id = thumbnail.public_id;
                Ok(video.clone())
            })
            .await?;

        Ok(updated)
    }

    /// Delete the record and its blobs. Owner only. Blob deletions are
    /// best-effort for the same reason as in [`Self::update_thumbnail`].
    pub async fn delete(&self, owner_id: Uuid, video_id: Uuid) -> Result<Video> {
        let video = self.get(video_id).await?;
        if video.owner_id != owner_id {
            return Err(ApiError::InvalidOperation(
                "only the owner can delete this video".to_string(),
            ));
        }

        if let Err(e) = self.media.delete(&video.video_id, MediaKind::Video).await {
            tracing::warn!(%video_id, error = %e, "failed to delete video blob");
        }
        if let Err(e) = self
            .media
            .delete(&video.thumbnail_id, MediaKind::Image)
            .await
        {
            tracing::warn!(%video_id, error = %e, "failed to delete thumbnail blob");
        }

        if !self.store.delete_video(video_id).await? {
            return Err(ApiError::NotFound("video"));
        }

        tracing::info!(%video_id, %owner_id, "video deleted");
        Ok(video)
    }
}
