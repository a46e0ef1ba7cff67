//! Repositories, one per aggregate.

mod comment_reply;
mod favorite_film;
mod film;
mod follow;
mod friend;
mod group;
mod message;
mod moderation;
mod notification;
mod review;
mod review_like;
mod user;

pub use comment_reply::CommentReplyRepository;
pub use favorite_film::FavoriteFilmRepository;
pub use film::FilmRepository;
pub use follow::FollowRepository;
pub use friend::FriendRepository;
pub use group::GroupRepository;
pub use message::MessageRepository;
pub use moderation::ModerationRepository;
pub use notification::NotificationRepository;
pub use review::ReviewRepository;
pub use review_like::ReviewLikeRepository;
pub use user::UserRepository;
