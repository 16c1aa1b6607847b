//! Record-store collaborator interface for the vidtube backend.
//!
//! The backend treats its durable store as an external collaborator: a
//! key-value record store with atomic per-document read-modify-write and a
//! unique constraint on the account email. This crate defines that interface
//! as a set of composable traits plus the document models, and ships an
//! in-memory implementation used by the test suite and by embedders that have
//! not wired a real driver.

pub mod memory;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use models::{Account, AccountPublic, Comment, Video};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced document does not exist. Carries the record kind for
    /// error messages ("account", "channel", "video", "comment").
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("email already registered")]
    EmailTaken,

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Account documents, keyed by id with a unique constraint on email.
///
/// `update_account` is the atomic read-modify-write primitive: the closure
/// observes the current document and mutates it in place; the store persists
/// the result only when the closure returns `Ok`, and no concurrent update of
/// the same document can interleave with it. Guard checks and the mutations
/// they protect belong inside one closure.
#[async_trait]
pub trait AccountStore {
    /// Insert a new account, enforcing email uniqueness.
    async fn insert_account(&self, account: Account) -> StoreResult<Account>;

    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Look up by email. Emails are stored lowercased; callers pass the
    /// already-normalized form.
    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Atomically read-modify-write one account document. An `Err` from the
    /// closure aborts the write and leaves the document untouched.
    async fn update_account<F, T>(&self, id: Uuid, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Account) -> StoreResult<T> + Send,
        T: Send;
}

/// Video documents.
#[async_trait]
pub trait VideoStore {
    async fn insert_video(&self, video: Video) -> StoreResult<Video>;

    async fn video(&self, id: Uuid) -> StoreResult<Option<Video>>;

    async fn videos_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Video>>;

    /// Atomically read-modify-write one video document. Same contract as
    /// [`AccountStore::update_account`].
    async fn update_video<F, T>(&self, id: Uuid, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Video) -> StoreResult<T> + Send,
        T: Send;

    /// Delete a video record. Returns `true` if it existed.
    async fn delete_video(&self, id: Uuid) -> StoreResult<bool>;
}

/// Comment documents.
#[async_trait]
pub trait CommentStore {
    async fn insert_comment(&self, comment: Comment) -> StoreResult<Comment>;

    async fn comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// Comments for a video, newest first.
    async fn comments_by_video(&self, video_id: Uuid) -> StoreResult<Vec<Comment>>;

    async fn update_comment<F, T>(&self, id: Uuid, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Comment) -> StoreResult<T> + Send,
        T: Send;

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;
}

/// Combined store interface the service layer is generic over.
pub trait RecordStore: AccountStore + VideoStore + CommentStore + Send + Sync {}

impl<S> RecordStore for S where S: AccountStore + VideoStore + CommentStore + Send + Sync {}
