//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod catalog;
pub mod channel_events;
pub mod follow;
pub mod friend;
pub mod group;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod review;

pub use account::AccountService;
pub use catalog::FilmService;
pub use channel_events::{ChannelPublisher, ChannelPublisherService, NoOpChannelPublisher};
pub use follow::FollowService;
pub use friend::FriendService;
pub use group::GroupService;
pub use message::MessageService;
pub use moderation::ModerationService;
pub use notification::NotificationService;
pub use review::ReviewService;
