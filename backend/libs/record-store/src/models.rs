//! Document models stored by the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Account document. Doubles as the "channel" side of subscriptions.
///
/// `subscriber_count` and `unsubscriber_count` are denormalized caches of
/// `subscribed_by` / `unsubscribed_by` cardinality and are recomputed inside
/// the same atomic update that mutates the sets. An account id is never in
/// both sets at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub channel_name: String,
    /// Unique across all accounts; stored trimmed and lowercased.
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    /// Blob-storage URL of the channel logo.
    pub logo_url: String,
    /// Blob-storage id of the channel logo.
    pub logo_id: String,
    /// The single active refresh token, replaced on each login/refresh and
    /// cleared on logout.
    pub refresh_token: Option<String>,
    pub subscriber_count: u64,
    pub unsubscriber_count: u64,
    /// Ids of accounts currently subscribed to this channel.
    pub subscribed_by: HashSet<Uuid>,
    /// Ids of accounts that subscribed in the past and actively unsubscribed.
    pub unsubscribed_by: HashSet<Uuid>,
    /// Channels this account is subscribed to (the subscriber-side relation).
    pub subscribed_channels: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        channel_name: String,
        email: String,
        phone: String,
        password_hash: String,
        logo_url: String,
        logo_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            channel_name,
            email,
            phone,
            password_hash,
            logo_url,
            logo_id,
            refresh_token: None,
            subscriber_count: 0,
            unsubscriber_count: 0,
            subscribed_by: HashSet::new(),
            unsubscribed_by: HashSet::new(),
            subscribed_channels: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Account projection returned to clients: everything except the password
/// hash and the refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPublic {
    pub id: Uuid,
    pub channel_name: String,
    pub email: String,
    pub phone: String,
    pub logo_url: String,
    pub logo_id: String,
    pub subscriber_count: u64,
    pub unsubscriber_count: u64,
    pub subscribed_by: HashSet<Uuid>,
    pub unsubscribed_by: HashSet<Uuid>,
    pub subscribed_channels: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountPublic {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            channel_name: a.channel_name,
            email: a.email,
            phone: a.phone,
            logo_url: a.logo_url,
            logo_id: a.logo_id,
            subscriber_count: a.subscriber_count,
            unsubscriber_count: a.unsubscriber_count,
            subscribed_by: a.subscribed_by,
            unsubscribed_by: a.unsubscribed_by,
            subscribed_channels: a.subscribed_channels,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Video document. The engagement target.
///
/// `likes`/`dislikes` cache the cardinality of `liked_by`/`disliked_by`; an
/// account id is never in both sets at once. `views` is a monotonic counter
/// with no membership set behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Blob-storage URL / id of the video asset.
    pub video_url: String,
    pub video_id: String,
    /// Blob-storage URL / id of the thumbnail asset.
    pub thumbnail_url: String,
    pub thumbnail_id: String,
    pub likes: u64,
    pub dislikes: u64,
    pub views: u64,
    pub liked_by: HashSet<Uuid>,
    pub disliked_by: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: Uuid,
        title: String,
        description: String,
        category: String,
        tags: Vec<String>,
        video_url: String,
        video_id: String,
        thumbnail_url: String,
        thumbnail_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            category,
            tags,
            video_url,
            video_id,
            thumbnail_url,
            thumbnail_id,
            likes: 0,
            dislikes: 0,
            views: 0,
            liked_by: HashSet::new(),
            disliked_by: HashSet::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Comment on a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(video_id: Uuid, author_id: Uuid, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            video_id,
            author_id,
            text,
            created_at: now,
            updated_at: now,
        }
    }
}
