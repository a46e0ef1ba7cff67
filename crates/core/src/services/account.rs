//! Account service: registration, authentication, password reset, profiles.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use reelhub_common::{AppError, AppResult, IdGenerator, TokenSigner};
use reelhub_db::{
    entities::user,
    repositories::{
        FavoriteFilmRepository, FilmRepository, FollowRepository, GroupRepository,
        ReviewRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use validator::Validate;

/// Lifetime of a password-reset token.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 64))]
    pub pseudo: String,
}

/// Input for updating a profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 64))]
    pub pseudo: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    pub avatar_url: Option<String>,

    pub favorite_genres: Option<Vec<String>>,
}

/// Aggregate statistics shown on a profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub review_count: u64,
    pub group_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
}

/// A full profile view. Projected into a safe response shape by the
/// API layer; the raw user row never reaches the wire.
#[derive(Debug)]
pub struct ProfileView {
    pub user: user::Model,
    pub stats: ProfileStats,
    pub favorite_films: Vec<reelhub_db::entities::film::Model>,
    pub recent_reviews: Vec<reelhub_db::entities::review::Model>,
    pub is_following: bool,
}

/// Outcome of a password-reset request.
///
/// The message is identical whether or not the email exists; the raw
/// token is only present in development mode, for accounts that exist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequested {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    review_repo: ReviewRepository,
    group_repo: GroupRepository,
    follow_repo: FollowRepository,
    favorite_repo: FavoriteFilmRepository,
    film_repo: FilmRepository,
    signer: TokenSigner,
    id_gen: IdGenerator,
    echo_reset_token: bool,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        review_repo: ReviewRepository,
        group_repo: GroupRepository,
        follow_repo: FollowRepository,
        favorite_repo: FavoriteFilmRepository,
        film_repo: FilmRepository,
        signer: TokenSigner,
        echo_reset_token: bool,
    ) -> Self {
        Self {
            user_repo,
            review_repo,
            group_repo,
            follow_repo,
            favorite_repo,
            film_repo,
            signer,
            id_gen: IdGenerator::new(),
            echo_reset_token,
        }
    }

    /// Register a new user and issue a token.
    pub async fn register(&self, input: RegisterInput) -> AppResult<(user::Model, String)> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account already exists with this email".to_string(),
            ));
        }

        if self.user_repo.find_by_pseudo(&input.pseudo).await?.is_some() {
            return Err(AppError::Conflict(
                "This display name is already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();

        let model = user::ActiveModel {
            id: Set(user_id.clone()),
            email: Set(input.email),
            password_hash: Set(password_hash),
            pseudo: Set(input.pseudo),
            avatar_url: Set(None),
            bio: Set(None),
            favorite_genres: Set(None),
            role: Set(user::UserRole::Member),
            reset_password_hash: Set(None),
            reset_password_expires: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        let token = self.signer.issue(&user.id)?;

        Ok((user, token))
    }

    /// Authenticate by email and password, issuing a token.
    ///
    /// Unknown email and wrong password return the same error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(user::Model, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.signer.issue(&user.id)?;
        Ok((user, token))
    }

    /// Resolve a token to its user.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.signer.verify(token)?;
        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Start a password reset.
    ///
    /// The response is identical whether or not the email exists.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<PasswordResetRequested> {
        let message = "If this email exists, a reset link has been sent".to_string();

        let Some(user) = self.user_repo.find_by_email(email).await? else {
            return Ok(PasswordResetRequested {
                message,
                reset_token: None,
            });
        };

        let raw_token = self.id_gen.generate_token();
        let token_hash = sha256_hex(&raw_token);
        let expires = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        let mut active: user::ActiveModel = user.into();
        active.reset_password_hash = Set(Some(token_hash));
        active.reset_password_expires = Set(Some(expires.into()));
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await?;

        Ok(PasswordResetRequested {
            message,
            reset_token: self.echo_reset_token.then_some(raw_token),
        })
    }

    /// Complete a password reset with a previously issued token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        if new_password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let token_hash = sha256_hex(token);
        let user = self
            .user_repo
            .find_by_reset_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest("Reset token is invalid or expired".to_string())
            })?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.reset_password_hash = Set(None);
        active.reset_password_expires = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await?;

        Ok(())
    }

    /// Update the caller's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(pseudo) = input.pseudo {
            if let Some(existing) = self.user_repo.find_by_pseudo(&pseudo).await?
                && existing.id != user_id
            {
                return Err(AppError::Conflict(
                    "This display name is already taken".to_string(),
                ));
            }
            active.pseudo = Set(pseudo);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(genres) = input.favorite_genres {
            active.favorite_genres = Set(Some(serde_json::json!(genres)));
        }

        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await
    }

    /// Assemble the full profile view of a user.
    pub async fn get_profile(
        &self,
        user_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<ProfileView> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let stats = self.stats_for(user_id).await?;

        let shelf = self.favorite_repo.list_for_user(user_id).await?;
        let film_ids: Vec<String> = shelf.iter().map(|s| s.film_id.clone()).collect();
        let mut favorite_films = self.film_repo.find_by_ids(&film_ids).await?;
        // Keep shelf order, not query order
        favorite_films.sort_by_key(|f| film_ids.iter().position(|id| *id == f.id));

        let mut recent_reviews = self.review_repo.list_by_user(user_id).await?;
        recent_reviews.truncate(3);

        let is_following = match viewer_id {
            Some(viewer) if viewer != user_id => {
                self.follow_repo.is_following(viewer, user_id).await?
            }
            _ => false,
        };

        Ok(ProfileView {
            user,
            stats,
            favorite_films,
            recent_reviews,
            is_following,
        })
    }

    /// Aggregate counts for a profile.
    pub async fn stats_for(&self, user_id: &str) -> AppResult<ProfileStats> {
        Ok(ProfileStats {
            review_count: self.review_repo.count_by_user(user_id).await?,
            group_count: self.group_repo.count_memberships_for_user(user_id).await?,
            followers_count: self.follow_repo.count_followers(user_id).await?,
            following_count: self.follow_repo.count_following(user_id).await?,
        })
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// SHA-256 of a token, hex-encoded. Reset tokens are stored hashed.
fn sha256_hex(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_sha256_hex_is_stable() {
        let a = sha256_hex("token");
        let b = sha256_hex("token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, sha256_hex("other"));
    }
}
