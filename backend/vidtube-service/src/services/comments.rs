//! Comment record operations. Plain CRUD; the caller identity is used for
//! authorship checks only.

use std::sync::Arc;

use record_store::{Comment, CommentStore, VideoStore};
use uuid::Uuid;

use crate::error::{ApiError, Result};

pub struct CommentService<S> {
    store: Arc<S>,
}

impl<S: CommentStore + VideoStore + Send + Sync> CommentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn add(&self, author_id: Uuid, video_id: Uuid, text: String) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation("comment text is required".to_string()));
        }
        if self.store.video(video_id).await?.is_none() {
            return Err(ApiError::NotFound("video"));
        }

        let comment = self
            .store
            .insert_comment(Comment::new(video_id, author_id, text))
            .await?;

        tracing::info!(comment_id = %comment.id, %video_id, "comment added");
        Ok(comment)
    }

    /// Edit a comment's text. Author only.
    pub async fn edit(&self, author_id: Uuid, comment_id: Uuid, text: String) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation("comment text is required".to_string()));
        }

        let updated = self
            .store
            .update_comment(comment_id, move |comment| {
                if comment.author_id != author_id {
                    return Ok(None);
                }
                comment.text = text;
                Ok(Some(comment.clone()))
            })
            .await?;

        updated.ok_or_else(|| {
            ApiError::InvalidOperation("only the author can edit this comment".to_string())
        })
    }

    /// Delete a comment. Author only.
    pub async fn remove(&self, author_id: Uuid, comment_id: Uuid) -> Result<()> {
        let comment = self
            .store
            .comment(comment_id)
            .await?
            .ok_or(ApiError::NotFound("comment"))?;

        if comment.author_id != author_id {
            return Err(ApiError::InvalidOperation(
                "only the author can delete this comment".to_string(),
            ));
        }

        if !self.store.delete_comment(comment_id).await? {
            return Err(ApiError::NotFound("comment"));
        }

        tracing::info!(%comment_id, "comment deleted");
        Ok(())
    }

    /// Comments on a video, newest first.
    pub async fn for_video(&self, video_id: Uuid) -> Result<Vec<Comment>> {
        if self.store.video(video_id).await?.is_none() {
            return Err(ApiError::NotFound("video"));
        }
        Ok(self.store.comments_by_video(video_id).await?)
    }
}
