//! SeaORM entities, one module per table.

pub mod comment_reply;
pub mod film;
pub mod follow;
pub mod friend_request;
pub mod friendship;
pub mod group;
pub mod group_film;
pub mod group_invitation;
pub mod group_member;
pub mod group_message;
pub mod notification;
pub mod reported_content;
pub mod review;
pub mod review_like;
pub mod user;
pub mod user_favorite_film;

pub use comment_reply::Entity as CommentReply;
pub use film::Entity as Film;
pub use follow::Entity as Follow;
pub use friend_request::Entity as FriendRequest;
pub use friendship::Entity as Friendship;
pub use group::Entity as Group;
pub use group_film::Entity as GroupFilm;
pub use group_invitation::Entity as GroupInvitation;
pub use group_member::Entity as GroupMember;
pub use group_message::Entity as GroupMessage;
pub use notification::Entity as Notification;
pub use reported_content::Entity as ReportedContent;
pub use review::Entity as Review;
pub use review_like::Entity as ReviewLike;
pub use user::Entity as User;
pub use user_favorite_film::Entity as UserFavoriteFilm;
