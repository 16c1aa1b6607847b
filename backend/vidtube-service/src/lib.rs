// Vidtube Service Library
//
// The core of the vidtube backend: credential and session lifecycle,
// the subscribe/unsubscribe relationship engine, the like/dislike engagement
// engine, and the plain video/comment record operations. The HTTP routing
// layer, the record-store driver and the blob-storage service are external
// collaborators consumed through the interfaces in `record-store` and
// `media`.

pub mod config;
pub mod error;
pub mod media;
pub mod middleware;
pub mod security;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use error::{ApiError, Result};
pub use middleware::session::{Identity, SessionAuthenticator};
pub use services::auth_service::{AuthService, RegisterRequest, Session};
pub use services::comments::CommentService;
pub use services::engagement::EngagementService;
pub use services::subscription::SubscriptionService;
pub use services::video_catalog::{VideoCatalog, VideoUpdate, VideoUpload};
