//! Channel event publishing.
//!
//! Provides an abstraction for pushing persisted rows to realtime
//! subscribers. The actual fan-out lives in the API layer; core
//! services publish through this trait so they never depend on the
//! transport.

use async_trait::async_trait;
use reelhub_common::AppResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A group message ready for broadcast, with the author denormalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessageEvent {
    pub id: String,
    pub group_id: String,
    pub text: String,
    pub created_at: String,
    pub author: MessageAuthor,
}

/// Denormalized author projection carried with every message event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAuthor {
    pub id: String,
    pub pseudo: String,
    pub avatar_url: Option<String>,
}

/// Trait for publishing realtime channel events.
///
/// Delivery is best-effort and fire-and-forget: a publish failure is
/// logged by the caller and never fails the originating operation.
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Publish a persisted group message to the group's channel.
    async fn publish_group_message(&self, event: GroupMessageEvent) -> AppResult<()>;
}

/// A no-op implementation for tests or when realtime delivery is disabled.
#[derive(Clone, Default)]
pub struct NoOpChannelPublisher;

#[async_trait]
impl ChannelPublisher for NoOpChannelPublisher {
    async fn publish_group_message(&self, _event: GroupMessageEvent) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `ChannelPublisher` trait object.
pub type ChannelPublisherService = Arc<dyn ChannelPublisher>;
