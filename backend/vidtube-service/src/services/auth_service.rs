//! Credential store and session lifecycle.
//!
//! Registration owns the only password-set path; login and refresh issue a
//! new token pair and persist the refresh token on the account, replacing any
//! prior value, so each account has exactly one active refresh token. Logout
//! clears it. Already-issued access tokens stay valid until natural expiry.

use std::path::Path;
use std::sync::Arc;

use jwt_security::{TokenKeys, TokenSubject};
use record_store::{Account, AccountPublic, AccountStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, Result};
use crate::media::{MediaKind, MediaStorage};
use crate::security::password;

/// Cookie name carrying the access token.
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie name carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "channel name is required"))]
    pub channel_name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "a valid phone number is required"))]
    pub phone: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Cookie the routing layer should set on the response. Both session cookies
/// are httpOnly and secure.
#[derive(Debug, Clone, Serialize)]
pub struct CookieSpec {
    pub name: &'static str,
    pub value: String,
    pub http_only: bool,
    pub secure: bool,
}

/// An established session: the public account record plus both tokens.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub account: AccountPublic,
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    /// The two cookies a successful login/refresh sets.
    pub fn cookies(&self) -> [CookieSpec; 2] {
        [
            CookieSpec {
                name: ACCESS_COOKIE,
                value: self.access_token.clone(),
                http_only: true,
                secure: true,
            },
            CookieSpec {
                name: REFRESH_COOKIE,
                value: self.refresh_token.clone(),
                http_only: true,
                secure: true,
            },
        ]
    }
}

pub struct AuthService<S, M> {
    store: Arc<S>,
    media: Arc<M>,
    keys: Arc<TokenKeys>,
}

impl<S, M> AuthService<S, M>
where
    S: AccountStore + Send + Sync,
    M: MediaStorage,
{
    pub fn new(store: Arc<S>, media: Arc<M>, keys: Arc<TokenKeys>) -> Self {
        Self { store, media, keys }
    }

    /// Register a new account. The staged logo file is uploaded to blob
    /// storage before the record is created; the email must be unused.
    pub async fn register(&self, req: RegisterRequest, logo_path: &Path) -> Result<AccountPublic> {
        req.validate()?;
        password::validate_password_strength(&req.password)?;

        let email = normalize_email(&req.email);
        if self.store.account_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let password_hash = password::hash_password(&req.password)?;
        let logo = self.media.upload(logo_path, MediaKind::Image).await?;

        let account = Account::new(
            req.channel_name.trim().to_string(),
            email,
            req.phone,
            password_hash,
            logo.url,
            logo.public_id,
        );

        // The store enforces uniqueness again; the pre-check above only
        // shortens the common duplicate path.
        let created = self.store.insert_account(account).await?;

        tracing::info!(account_id = %created.id, "account registered");
        Ok(created.into())
    }

    /// Verify credentials and establish a session. Unknown email and wrong
    /// password are indistinguishable to the client; the difference is only
    /// logged.
    pub async fn login(&self, email: &str, plaintext: &str) -> Result<Session> {
        let email = normalize_email(email);

        let account = match self.store.account_by_email(&email).await? {
            Some(account) => account,
            None => {
                tracing::info!("login attempt for unknown email");
                return Err(ApiError::InvalidCredentials);
            }
        };

        if !password::verify_password(plaintext, &account.password_hash)? {
            tracing::info!(account_id = %account.id, "login with wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let session = self.issue_session(account).await?;
        tracing::info!(account_id = %session.account.id, "logged in");
        Ok(session)
    }

    /// Rotate a session: the presented refresh token must match the single
    /// persisted one, and is replaced by the freshly issued pair.
    pub async fn refresh_session(&self, presented: &str) -> Result<Session> {
        let claims = self.keys.verify_refresh(presented)?;
        let account_id = claims.account_id()?;

        let account = self
            .store
            .account(account_id)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        if account.refresh_token.as_deref() != Some(presented) {
            // Replaced by a later login, or cleared by logout.
            return Err(ApiError::Unauthenticated);
        }

        let session = self.issue_session(account).await?;
        tracing::info!(account_id = %session.account.id, "session refreshed");
        Ok(session)
    }

    /// Clear the persisted refresh token. Returns the cookie names the
    /// routing layer should clear. Access tokens cannot be revoked early.
    pub async fn logout(&self, account_id: Uuid) -> Result<[&'static str; 2]> {
        self.store
            .update_account(account_id, |account| {
                account.refresh_token = None;
                Ok(())
            })
            .await?;

        tracing::info!(%account_id, "logged out");
        Ok([ACCESS_COOKIE, REFRESH_COOKIE])
    }

    /// Re-hash the password after verifying the current one.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current: &str,
        new_password: &str,
    ) -> Result<()> {
        password::validate_password_strength(new_password)?;

        let account = self
            .store
            .account(account_id)
            .await?
            .ok_or(ApiError::NotFound("account"))?;

        if !password::verify_password(current, &account.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        let new_hash = password::hash_password(new_password)?;
        self.store
            .update_account(account_id, move |account| {
                account.password_hash = new_hash;
                Ok(())
            })
            .await?;

        tracing::info!(%account_id, "password changed");
        Ok(())
    }

    /// Issue a token pair and persist the refresh token, replacing any prior
    /// one. A persistence failure fails the whole login.
    async fn issue_session(&self, account: Account) -> Result<Session> {
        let subject = TokenSubject {
            account_id: account.id,
            channel_name: account.channel_name.clone(),
            email: account.email.clone(),
            logo_id: account.logo_id.clone(),
        };

        let access_token = self.keys.issue_access(&subject)?;
        let refresh_token = self.keys.issue_refresh(account.id)?;

        let persisted_refresh = refresh_token.clone();
        let updated = self
            .store
            .update_account(account.id, move |account| {
                account.refresh_token = Some(persisted_refresh);
                Ok(account.clone())
            })
            .await?;

        Ok(Session {
            account: updated.into(),
            access_token,
            refresh_token,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
