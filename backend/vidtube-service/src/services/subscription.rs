//! Subscribe/unsubscribe relationship engine.
//!
//! Per (subscriber, channel) pair the channel document holds the state:
//! absent from both sets (never subscribed), in `subscribed_by`, or in
//! `unsubscribed_by` (subscribed in the past, then actively unsubscribed).
//! The guard check, both set mutations and both counters are applied in one
//! atomic update of the channel document, so concurrent calls for the same
//! pair cannot double-count.
//!
//! The subscriber-side `subscribed_channels` set is a second denormalized
//! relation updated in a separate document write. The two writes are not
//! transactional; instead each side is idempotent and a retry converges: when
//! the channel side already holds the target state but the subscriber side
//! does not, the call repairs the subscriber side and reports success. Only
//! when both sides already hold does it fail the state-machine guard.

use std::sync::Arc;

use record_store::{Account, AccountPublic, AccountStore, StoreError};
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// Outcome of the channel-document transition.
enum ChannelSide {
    Applied,
    AlreadyInState,
}

pub struct SubscriptionService<S> {
    store: Arc<S>,
}

impl<S: AccountStore + Send + Sync> SubscriptionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Subscribe `subscriber_id` to `channel_id`. Returns the updated channel.
    ///
    /// Fails `InvalidOperation` on self-subscription (checked before any
    /// store read), `NotFound` when either account is missing, and
    /// `AlreadySubscribed` when the pair is already in the subscribed state
    /// on both sides.
    pub async fn subscribe(&self, subscriber_id: Uuid, channel_id: Uuid) -> Result<AccountPublic> {
        if subscriber_id == channel_id {
            return Err(ApiError::InvalidOperation(
                "cannot subscribe to your own channel".to_string(),
            ));
        }

        if self.store.account(subscriber_id).await?.is_none() {
            return Err(ApiError::NotFound("account"));
        }

        let (channel_state, channel) = self
            .store
            .update_account(channel_id, move |channel| {
                if channel.subscribed_by.contains(&subscriber_id) {
                    return Ok((ChannelSide::AlreadyInState, channel.clone()));
                }

                // NONE and UNSUBSCRIBED both transition to SUBSCRIBED; a
                // prior unsubscribe record is consumed by the re-subscribe.
                channel.unsubscribed_by.remove(&subscriber_id);
                channel.subscribed_by.insert(subscriber_id);
                sync_counters(channel);
                Ok((ChannelSide::Applied, channel.clone()))
            })
            .await
            .map_err(not_found_as_channel)?;

        // Subscriber-side relation, idempotent set insert.
        let subscriber_changed = self
            .store
            .update_account(subscriber_id, move |account| {
                Ok(account.subscribed_channels.insert(channel_id))
            })
            .await?;

        match (channel_state, subscriber_changed) {
            (ChannelSide::Applied, _) => {
                tracing::info!(%subscriber_id, %channel_id, "subscribed");
                Ok(channel.into())
            }
            (ChannelSide::AlreadyInState, true) => {
                // A previous call updated the channel but failed before the
                // subscriber side; this retry completed it.
                tracing::warn!(%subscriber_id, %channel_id, "repaired dangling subscribe");
                Ok(channel.into())
            }
            (ChannelSide::AlreadyInState, false) => Err(ApiError::AlreadySubscribed),
        }
    }

    /// Unsubscribe `subscriber_id` from `channel_id`. Returns the updated
    /// channel. Fails `NotSubscribed` unless the pair is currently in the
    /// subscribed state (on at least one side).
    pub async fn unsubscribe(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> Result<AccountPublic> {
        if subscriber_id == channel_id {
            return Err(ApiError::InvalidOperation(
                "cannot unsubscribe from your own channel".to_string(),
            ));
        }

        if self.store.account(subscriber_id).await?.is_none() {
            return Err(ApiError::NotFound("account"));
        }

        let (channel_state, channel) = self
            .store
            .update_account(channel_id, move |channel| {
                if !channel.subscribed_by.remove(&subscriber_id) {
                    // NONE or already UNSUBSCRIBED; no transition available.
                    return Ok((ChannelSide::AlreadyInState, channel.clone()));
                }

                channel.unsubscribed_by.insert(subscriber_id);
                sync_counters(channel);
                Ok((ChannelSide::Applied, channel.clone()))
            })
            .await
            .map_err(not_found_as_channel)?;

        let subscriber_changed = self
            .store
            .update_account(subscriber_id, move |account| {
                Ok(account.subscribed_channels.remove(&channel_id))
            })
            .await?;

        match (channel_state, subscriber_changed) {
            (ChannelSide::Applied, _) => {
                tracing::info!(%subscriber_id, %channel_id, "unsubscribed");
                Ok(channel.into())
            }
            (ChannelSide::AlreadyInState, true) => {
                tracing::warn!(%subscriber_id, %channel_id, "repaired dangling unsubscribe");
                Ok(channel.into())
            }
            (ChannelSide::AlreadyInState, false) => Err(ApiError::NotSubscribed),
        }
    }
}

/// Counters are caches of set cardinality; recompute them whenever the sets
/// change so they can never drift inside a committed document.
fn sync_counters(channel: &mut Account) {
    channel.subscriber_count = channel.subscribed_by.len() as u64;
    channel.unsubscriber_count = channel.unsubscribed_by.len() as u64;
}

/// The channel lookup happens through `update_account`; a missing document
/// there means the channel, not the caller, is gone.
fn not_found_as_channel(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => ApiError::NotFound("channel"),
        other => other.into(),
    }
}
