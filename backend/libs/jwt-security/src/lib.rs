//! Token issuance and verification for the vidtube backend.
//!
//! Two token kinds are signed with distinct HS256 secrets:
//! - access tokens carry the public profile claims and a short expiry
//! - refresh tokens carry the subject id plus a unique token id and a long
//!   expiry
//!
//! Both tokens are stateless and self-contained: verification needs the
//! signing secret and nothing else. Revocation before natural expiry is
//! deliberately unsupported; the service layer clears the persisted refresh
//! token on logout instead.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, TokenError>;

/// Claims carried by an access token: subject id plus the public profile
/// fields the routing layer may echo back without a store lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (account id as UUID string)
    pub sub: String,
    /// Display name of the channel
    pub channel_name: String,
    /// Account email
    pub email: String,
    /// Blob-storage id of the profile image
    pub logo_id: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// JWT ID, unique per issued token
    pub jti: String,
}

impl AccessClaims {
    /// Parse the subject back into an account id.
    pub fn account_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

/// Claims carried by a refresh token: subject id plus a unique token id.
///
/// The `jti` makes every issued token distinct even when two are minted
/// within the same second; rotation relies on this so the previously stored
/// refresh token never byte-matches its replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl RefreshClaims {
    pub fn account_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

/// Identity fields embedded into a freshly issued access token.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub account_id: Uuid,
    pub channel_name: String,
    pub email: String,
    pub logo_id: String,
}

/// Key material and expiry policy for both token kinds.
///
/// The two secrets must differ so a refresh token can never pass access-token
/// verification or vice versa.
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenKeys {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Sign an access token for the given subject.
    pub fn issue_access(&self, subject: &TokenSubject) -> Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: subject.account_id.to_string(),
            channel_name: subject.channel_name.clone(),
            email: subject.email.clone(),
            logo_id: subject.logo_id.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Sign a refresh token carrying only the account id.
    pub fn issue_refresh(&self, account_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.refresh_encoding,
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry of an access token.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims> {
        verify::<AccessClaims>(token, &self.access_decoding)
    }

    /// Verify signature and expiry of a refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims> {
        verify::<RefreshClaims>(token, &self.refresh_decoding)
    }
}

fn verify<C: DeserializeOwned>(token: &str, key: &DecodingKey) -> Result<C> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // No clock-skew leeway: a token past its expiry is rejected immediately.
    validation.leeway = 0;

    match decode::<C>(token, key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => {
                tracing::debug!(error = %e, "token verification failed");
                Err(TokenError::Invalid)
            }
        },
    }
}
