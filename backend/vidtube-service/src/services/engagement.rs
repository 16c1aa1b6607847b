//! Like/dislike engagement engine and the view counter.
//!
//! Engagement state per (account, video) pair lives entirely on the video
//! document, so every transition is a single atomic read-modify-write: guard
//! check, opposite-set removal, set insert and both counters commit as one
//! observable state. There is no operation back to neutral; once engaged,
//! only like <-> dislike transitions are reachable.

use std::sync::Arc;

use record_store::{Video, VideoStore};
use uuid::Uuid;

use crate::error::{ApiError, Result};

pub struct EngagementService<S> {
    store: Arc<S>,
}

impl<S: VideoStore + Send + Sync> EngagementService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Like a video. A standing dislike from the same account is withdrawn in
    /// the same update. Fails `AlreadyLiked` when already in the liked state.
    pub async fn like(&self, account_id: Uuid, video_id: Uuid) -> Result<Video> {
        let applied = self
            .store
            .update_video(video_id, move |video| {
                if video.liked_by.contains(&account_id) {
                    return Ok(None);
                }
                video.disliked_by.remove(&account_id);
                video.liked_by.insert(account_id);
                sync_counters(video);
                Ok(Some(video.clone()))
            })
            .await?;

        match applied {
            Some(video) => {
                tracing::info!(%account_id, %video_id, "video liked");
                Ok(video)
            }
            None => Err(ApiError::AlreadyLiked),
        }
    }

    /// Dislike a video. Mirror image of [`Self::like`].
    pub async fn dislike(&self, account_id: Uuid, video_id: Uuid) -> Result<Video> {
        let applied = self
            .store
            .update_video(video_id, move |video| {
                if video.disliked_by.contains(&account_id) {
                    return Ok(None);
                }
                video.liked_by.remove(&account_id);
                video.disliked_by.insert(account_id);
                sync_counters(video);
                Ok(Some(video.clone()))
            })
            .await?;

        match applied {
            Some(video) => {
                tracing::info!(%account_id, %video_id, "video disliked");
                Ok(video)
            }
            None => Err(ApiError::AlreadyDisliked),
        }
    }

    /// Record one view. Unauthenticated, monotonic, deliberately not
    /// idempotent: every call adds one. Returns the new count.
    pub async fn increment_views(&self, video_id: Uuid) -> Result<u64> {
        let views = self
            .store
            .update_video(video_id, |video| {
                video.views += 1;
                Ok(video.views)
            })
            .await?;

        Ok(views)
    }
}

fn sync_counters(video: &mut Video) {
    video.likes = video.liked_by.len() as u64;
    video.dislikes = video.disliked_by.len() as u64;
}
