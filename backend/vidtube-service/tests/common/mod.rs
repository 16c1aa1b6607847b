#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use jwt_security::TokenKeys;
use record_store::{Account, AccountStore, MemoryStore};
use uuid::Uuid;
use vidtube_service::media::{MediaAsset, MediaError, MediaKind, MediaStorage};

/// Blob-storage stand-in: hands out sequential ids, never fails.
#[derive(Default)]
pub struct FakeMedia {
    counter: AtomicU64,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStorage for FakeMedia {
    async fn upload(&self, _local_path: &Path, _kind: MediaKind) -> Result<MediaAsset, MediaError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(MediaAsset {
            public_id: format!("blob-{n}"),
            url: format!("https://blobs.test/blob-{n}"),
        })
    }

    async fn delete(&self, _public_id: &str, _kind: MediaKind) -> Result<(), MediaError> {
        Ok(())
    }
}

pub fn token_keys() -> Arc<TokenKeys> {
    Arc::new(TokenKeys::new(
        "test-access-secret",
        "test-refresh-secret",
        Duration::hours(1),
        Duration::days(7),
    ))
}

/// Insert an account directly, bypassing registration. The password hash is a
/// placeholder; use `AuthService::register` in tests that exercise login.
pub async fn seed_account(store: &MemoryStore, channel_name: &str, email: &str) -> Account {
    let account = Account::new(
        channel_name.to_string(),
        email.to_string(),
        "5550100".to_string(),
        "not-a-real-hash".to_string(),
        "https://blobs.test/logo".to_string(),
        "logo-blob".to_string(),
    );
    store.insert_account(account).await.unwrap()
}

pub fn missing_id() -> Uuid {
    Uuid::new_v4()
}
