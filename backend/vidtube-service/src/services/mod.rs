pub mod auth_service;
pub mod comments;
pub mod engagement;
pub mod subscription;
pub mod video_catalog;
