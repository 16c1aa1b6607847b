mod common;

use std::sync::Arc;

use common::{missing_id, seed_account};
use record_store::{MemoryStore, Video, VideoStore};
use uuid::Uuid;
use vidtube_service::{ApiError, EngagementService};

async fn seed_video(store: &MemoryStore, owner_id: Uuid) -> Video {
    let video = Video::new(
        owner_id,
        "intro".to_string(),
        "first upload".to_string(),
        "tech".to_string(),
        vec!["rust".to_string()],
        "https://blobs.test/v".to_string(),
        "video-blob".to_string(),
        "https://blobs.test/t".to_string(),
        "thumb-blob".to_string(),
    );
    store.insert_video(video).await.unwrap()
}

#[tokio::test]
async fn like_from_neutral_increments_count() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let viewer = seed_account(&store, "viewer", "viewer@example.com").await;
    let video = seed_video(&store, missing_id()).await;

    let liked = engagement.like(viewer.id, video.id).await.unwrap();

    assert_eq!(liked.likes, 1);
    assert_eq!(liked.dislikes, 0);
    assert!(liked.liked_by.contains(&viewer.id));
}

#[tokio::test]
async fn second_like_fails_without_changing_state() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let viewer = seed_account(&store, "viewer", "viewer@example.com").await;
    let video = seed_video(&store, missing_id()).await;

    engagement.like(viewer.id, video.id).await.unwrap();
    let err = engagement.like(viewer.id, video.id).await.unwrap_err();
    assert!(matches!(err, ApiError::AlreadyLiked));

    let stored = store.video(video.id).await.unwrap().unwrap();
    assert_eq!(stored.likes, 1);
}

#[tokio::test]
async fn like_while_disliked_swaps_both_counters() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let viewer = seed_account(&store, "viewer", "viewer@example.com").await;
    let video = seed_video(&store, missing_id()).await;

    engagement.dislike(viewer.id, video.id).await.unwrap();
    let liked = engagement.like(viewer.id, video.id).await.unwrap();

    // One observable state: +1 like, -1 dislike.
    assert_eq!(liked.likes, 1);
    assert_eq!(liked.dislikes, 0);
    assert!(liked.liked_by.contains(&viewer.id));
    assert!(!liked.disliked_by.contains(&viewer.id));
}

#[tokio::test]
async fn dislike_while_liked_swaps_both_counters() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let viewer = seed_account(&store, "viewer", "viewer@example.com").await;
    let video = seed_video(&store, missing_id()).await;

    engagement.like(viewer.id, video.id).await.unwrap();
    let disliked = engagement.dislike(viewer.id, video.id).await.unwrap();

    assert_eq!(disliked.likes, 0);
    assert_eq!(disliked.dislikes, 1);
}

#[tokio::test]
async fn second_dislike_fails() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let viewer = seed_account(&store, "viewer", "viewer@example.com").await;
    let video = seed_video(&store, missing_id()).await;

    engagement.dislike(viewer.id, video.id).await.unwrap();
    let err = engagement.dislike(viewer.id, video.id).await.unwrap_err();
    assert!(matches!(err, ApiError::AlreadyDisliked));
}

#[tokio::test]
async fn account_never_in_both_engagement_sets() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let viewer = seed_account(&store, "viewer", "viewer@example.com").await;
    let video = seed_video(&store, missing_id()).await;

    engagement.like(viewer.id, video.id).await.unwrap();
    engagement.dislike(viewer.id, video.id).await.unwrap();
    engagement.like(viewer.id, video.id).await.unwrap();
    let _ = engagement.like(viewer.id, video.id).await;

    let stored = store.video(video.id).await.unwrap().unwrap();
    assert!(stored
        .liked_by
        .intersection(&stored.disliked_by)
        .next()
        .is_none());
    assert_eq!(stored.likes as usize, stored.liked_by.len());
    assert_eq!(stored.dislikes as usize, stored.disliked_by.len());
}

#[tokio::test]
async fn views_increment_monotonically() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let video = seed_video(&store, missing_id()).await;

    assert_eq!(engagement.increment_views(video.id).await.unwrap(), 1);
    assert_eq!(engagement.increment_views(video.id).await.unwrap(), 2);
    assert_eq!(engagement.increment_views(video.id).await.unwrap(), 3);
}

#[tokio::test]
async fn engagement_on_unknown_video_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let engagement = EngagementService::new(store.clone());
    let viewer = seed_account(&store, "viewer", "viewer@example.com").await;

    let err = engagement.like(viewer.id, missing_id()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("video")));

    let err = engagement.increment_views(missing_id()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("video")));
}
