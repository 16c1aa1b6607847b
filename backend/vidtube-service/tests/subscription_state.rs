mod common;

use std::sync::Arc;

use common::{missing_id, seed_account};
use record_store::{AccountStore, MemoryStore};
use vidtube_service::{ApiError, SubscriptionService};

fn service(store: &Arc<MemoryStore>) -> SubscriptionService<MemoryStore> {
    SubscriptionService::new(store.clone())
}

#[tokio::test]
async fn subscribe_updates_both_sides_and_counters() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    let channel = subs.subscribe(u1.id, u2.id).await.unwrap();

    assert_eq!(channel.subscriber_count, 1);
    assert!(channel.subscribed_by.contains(&u1.id));
    assert_eq!(channel.subscriber_count as usize, channel.subscribed_by.len());

    let subscriber = store.account(u1.id).await.unwrap().unwrap();
    assert!(subscriber.subscribed_channels.contains(&u2.id));
}

#[tokio::test]
async fn second_subscribe_fails_without_changing_state() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    subs.subscribe(u1.id, u2.id).await.unwrap();
    let after_first = store.account(u2.id).await.unwrap().unwrap();

    let err = subs.subscribe(u1.id, u2.id).await.unwrap_err();
    assert!(matches!(err, ApiError::AlreadySubscribed));

    let after_second = store.account(u2.id).await.unwrap().unwrap();
    assert_eq!(after_second.subscriber_count, after_first.subscriber_count);
    assert_eq!(after_second.subscribed_by, after_first.subscribed_by);
    assert_eq!(after_second.unsubscribed_by, after_first.unsubscribed_by);
}

#[tokio::test]
async fn unsubscribe_moves_pair_to_unsubscribed() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    subs.subscribe(u1.id, u2.id).await.unwrap();
    let channel = subs.unsubscribe(u1.id, u2.id).await.unwrap();

    assert_eq!(channel.subscriber_count, 0);
    assert_eq!(channel.unsubscriber_count, 1);
    assert!(!channel.subscribed_by.contains(&u1.id));
    assert!(channel.unsubscribed_by.contains(&u1.id));

    let subscriber = store.account(u1.id).await.unwrap().unwrap();
    assert!(!subscriber.subscribed_channels.contains(&u2.id));
}

#[tokio::test]
async fn unsubscribe_without_subscription_fails() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    let err = subs.unsubscribe(u1.id, u2.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotSubscribed));

    // After a full unsubscribe the pair is UNSUBSCRIBED, not NONE; a second
    // unsubscribe still fails the same guard.
    subs.subscribe(u1.id, u2.id).await.unwrap();
    subs.unsubscribe(u1.id, u2.id).await.unwrap();
    let err = subs.unsubscribe(u1.id, u2.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotSubscribed));
}

#[tokio::test]
async fn resubscribe_round_trip_restores_counters() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    subs.subscribe(u1.id, u2.id).await.unwrap();
    subs.unsubscribe(u1.id, u2.id).await.unwrap();
    let channel = subs.subscribe(u1.id, u2.id).await.unwrap();

    // Net +1 subscriber versus the initial state, unsubscriber count back to
    // its pre-sequence value.
    assert_eq!(channel.subscriber_count, 1);
    assert_eq!(channel.unsubscriber_count, 0);
    assert!(channel.subscribed_by.contains(&u1.id));
    assert!(channel.unsubscribed_by.is_empty());
}

#[tokio::test]
async fn subscriber_never_in_both_sets() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    subs.subscribe(u1.id, u2.id).await.unwrap();
    subs.unsubscribe(u1.id, u2.id).await.unwrap();
    subs.subscribe(u1.id, u2.id).await.unwrap();
    let _ = subs.subscribe(u1.id, u2.id).await;

    let channel = store.account(u2.id).await.unwrap().unwrap();
    assert!(channel
        .subscribed_by
        .intersection(&channel.unsubscribed_by)
        .next()
        .is_none());
    assert_eq!(channel.subscriber_count as usize, channel.subscribed_by.len());
    assert_eq!(
        channel.unsubscriber_count as usize,
        channel.unsubscribed_by.len()
    );
}

#[tokio::test]
async fn self_subscription_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;

    let err = subs.subscribe(u1.id, u1.id).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));

    let err = subs.unsubscribe(u1.id, u1.id).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));
}

#[tokio::test]
async fn unknown_channel_and_subscriber_are_not_found() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;

    let err = subs.subscribe(u1.id, missing_id()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("channel")));

    let err = subs.subscribe(missing_id(), u1.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("account")));
}

#[tokio::test]
async fn retry_repairs_half_written_subscribe() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    // Simulate a subscribe that committed the channel side and then lost the
    // subscriber-side write.
    store
        .update_account(u2.id, |channel| {
            channel.subscribed_by.insert(u1.id);
            channel.subscriber_count = 1;
            Ok(())
        })
        .await
        .unwrap();

    // The retry must succeed, complete the subscriber side and not
    // double-count the channel side.
    let channel = subs.subscribe(u1.id, u2.id).await.unwrap();
    assert_eq!(channel.subscriber_count, 1);

    let subscriber = store.account(u1.id).await.unwrap().unwrap();
    assert!(subscriber.subscribed_channels.contains(&u2.id));

    // Once converged, the guard applies again.
    let err = subs.subscribe(u1.id, u2.id).await.unwrap_err();
    assert!(matches!(err, ApiError::AlreadySubscribed));
}

#[tokio::test]
async fn retry_repairs_half_written_unsubscribe() {
    let store = Arc::new(MemoryStore::new());
    let subs = service(&store);
    let u1 = seed_account(&store, "u1", "u1@example.com").await;
    let u2 = seed_account(&store, "u2", "u2@example.com").await;

    subs.subscribe(u1.id, u2.id).await.unwrap();

    // Simulate an unsubscribe that committed the channel side only.
    store
        .update_account(u2.id, |channel| {
            channel.subscribed_by.remove(&u1.id);
            channel.unsubscribed_by.insert(u1.id);
            channel.subscriber_count = 0;
            channel.unsubscriber_count = 1;
            Ok(())
        })
        .await
        .unwrap();

    let channel = subs.unsubscribe(u1.id, u2.id).await.unwrap();
    assert_eq!(channel.subscriber_count, 0);
    assert_eq!(channel.unsubscriber_count, 1);

    let subscriber = store.account(u1.id).await.unwrap().unwrap();
    assert!(!subscriber.subscribed_channels.contains(&u2.id));

    let err = subs.unsubscribe(u1.id, u2.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotSubscribed));
}
