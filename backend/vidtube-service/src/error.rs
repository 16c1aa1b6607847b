use jwt_security::TokenError;
use record_store::StoreError;
use thiserror::Error;

use crate::media::MediaError;

/// Error taxonomy surfaced to the routing layer.
///
/// Client-attributable kinds map to 4xx, dependency failures to 500. The
/// state-machine guard variants (`AlreadySubscribed`, `NotSubscribed`,
/// `AlreadyLiked`, `AlreadyDisliked`) are client logic errors, not server
/// faults.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized request")]
    Unauthenticated,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("already subscribed to this channel")]
    AlreadySubscribed,

    #[error("not subscribed to this channel")]
    NotSubscribed,

    #[error("already liked this video")]
    AlreadyLiked,

    #[error("already disliked this video")]
    AlreadyDisliked,

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("dependency failure: {0}")]
    Dependency(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status the routing layer should respond with.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthenticated => 401,
            ApiError::InvalidCredentials => 400,
            ApiError::EmailTaken => 409,
            ApiError::NotFound(_) => 404,
            ApiError::AlreadySubscribed
            | ApiError::NotSubscribed
            | ApiError::AlreadyLiked
            | ApiError::AlreadyDisliked => 400,
            ApiError::InvalidOperation(_) | ApiError::Validation(_) => 400,
            ApiError::Dependency(_) => 500,
        }
    }

    /// Stable machine-readable kind for structured error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::EmailTaken => "email_taken",
            ApiError::NotFound(_) => "not_found",
            ApiError::AlreadySubscribed => "already_subscribed",
            ApiError::NotSubscribed => "not_subscribed",
            ApiError::AlreadyLiked => "already_liked",
            ApiError::AlreadyDisliked => "already_disliked",
            ApiError::InvalidOperation(_) => "invalid_operation",
            ApiError::Validation(_) => "validation",
            ApiError::Dependency(_) => "dependency_failure",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(kind) => ApiError::NotFound(kind),
            StoreError::EmailTaken => ApiError::EmailTaken,
            StoreError::Backend(msg) => ApiError::Dependency(msg),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid => ApiError::Unauthenticated,
            TokenError::Encoding(msg) => ApiError::Dependency(msg),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        ApiError::Dependency(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
