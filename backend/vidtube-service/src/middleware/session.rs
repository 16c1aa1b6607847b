/// Session authentication boundary.
///
/// Every identity-dependent operation runs behind `authenticate`: it accepts
/// the access token from the `accessToken` cookie or the `Authorization:
/// Bearer` header (cookie wins), verifies it, and resolves the subject
/// against the record store. Nothing is cached beyond the request.
use std::sync::Arc;

use jwt_security::TokenKeys;
use record_store::AccountStore;
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// Verified caller identity for the remainder of one request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub account_id: Uuid,
    pub channel_name: String,
    pub email: String,
}

pub struct SessionAuthenticator<S> {
    store: Arc<S>,
    keys: Arc<TokenKeys>,
}

impl<S: AccountStore + Send + Sync> SessionAuthenticator<S> {
    pub fn new(store: Arc<S>, keys: Arc<TokenKeys>) -> Self {
        Self { store, keys }
    }

    /// Resolve the caller identity from the request credentials, or reject.
    ///
    /// `cookie` is the value of the `accessToken` cookie if present;
    /// `authorization` is the raw `Authorization` header. A vanished account
    /// is indistinguishable from a bad token to the client.
    pub async fn authenticate(
        &self,
        cookie: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<Identity> {
        let token = extract_token(cookie, authorization)?;
        let claims = self.keys.verify_access(token)?;
        let account_id = claims.account_id()?;

        let account = self
            .store
            .account(account_id)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        Ok(Identity {
            account_id: account.id,
            channel_name: account.channel_name,
            email: account.email,
        })
    }
}

/// Pick the access token out of the request: cookie takes precedence over
/// the bearer header.
fn extract_token<'a>(
    cookie: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Result<&'a str> {
    if let Some(token) = cookie.filter(|t| !t.is_empty()) {
        return Ok(token);
    }

    authorization
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthenticated)
}
