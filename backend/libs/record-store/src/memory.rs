//! In-memory record store.
//!
//! One `RwLock`-guarded map per collection. Holding the collection write lock
//! for the whole read-modify-write stands in for the per-document update
//! serialization a real driver provides; it is coarser, but gives the same
//! observable atomicity. Closure failures abort the write by mutating a draft
//! copy and only committing it on `Ok`.

use crate::models::{Account, Comment, Video};
use crate::{AccountStore, CommentStore, StoreError, StoreResult, VideoStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
    videos: RwLock<HashMap<Uuid, Video>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::EmailTaken);
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn update_account<F, T>(&self, id: Uuid, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Account) -> StoreResult<T> + Send,
        T: Send,
    {
        let mut accounts = self.accounts.write().await;
        let doc = accounts.get_mut(&id).ok_or(StoreError::NotFound("account"))?;

        let mut draft = doc.clone();
        let out = apply(&mut draft)?;
        draft.updated_at = Utc::now();
        *doc = draft;
        Ok(out)
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn insert_video(&self, video: Video) -> StoreResult<Video> {
        self.videos.write().await.insert(video.id, video.clone());
        Ok(video)
    }

    async fn video(&self, id: Uuid) -> StoreResult<Option<Video>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn videos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Video>> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn update_video<F, T>(&self, id: Uuid, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Video) -> StoreResult<T> + Send,
        T: Send,
    {
        let mut videos = self.videos.write().await;
        let doc = videos.get_mut(&id).ok_or(StoreError::NotFound("video"))?;

        let mut draft = doc.clone();
        let out = apply(&mut draft)?;
        draft.updated_at = Utc::now();
        *doc = draft;
        Ok(out)
    }

    async fn delete_video(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.videos.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(&self, comment: Comment) -> StoreResult<Comment> {
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn comments_by_video(&self, video_id: Uuid) -> StoreResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn update_comment<F, T>(&self, id: Uuid, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Comment) -> StoreResult<T> + Send,
        T: Send,
    {
        let mut comments = self.comments.write().await;
        let doc = comments.get_mut(&id).ok_or(StoreError::NotFound("comment"))?;

        let mut draft = doc.clone();
        let out = apply(&mut draft)?;
        draft.updated_at = Utc::now();
        *doc = draft;
        Ok(out)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.comments.write().await.remove(&id).is_some())
    }
}
