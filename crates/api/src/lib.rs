//! HTTP API layer for reelhub.
//!
//! This crate provides the REST API and realtime streaming:
//!
//! - **Endpoints**: accounts, social graph, films, reviews, groups,
//!   moderation, notifications
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token resolution
//! - **Streaming**: per-group websocket channels
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod streaming;

pub use endpoints::router;
pub use middleware::AppState;
pub use streaming::{ChannelState, streaming_handler};
