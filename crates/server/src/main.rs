//! Reelhub server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use reelhub_api::{AppState, ChannelState, router as api_router, streaming_handler};
use reelhub_common::{Config, TokenSigner};
use reelhub_core::{
    AccountService, FilmService, FollowService, FriendService, GroupService, MessageService,
    ModerationService, NotificationService, ReviewService,
    channel_events::ChannelPublisherService,
};
use reelhub_db::repositories::{
    CommentReplyRepository, FavoriteFilmRepository, FilmRepository, FollowRepository,
    FriendRepository, GroupRepository, MessageRepository, ModerationRepository,
    NotificationRepository, ReviewLikeRepository, ReviewRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelhub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting reelhub server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = reelhub_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    reelhub_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let film_repo = FilmRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let review_like_repo = ReviewLikeRepository::new(Arc::clone(&db));
    let comment_reply_repo = CommentReplyRepository::new(Arc::clone(&db));
    let friend_repo = FriendRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let message_repo = MessageRepository::new(Arc::clone(&db));
    let moderation_repo = ModerationRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteFilmRepository::new(Arc::clone(&db));

    // Token signer shared by the REST and streaming layers
    let signer = TokenSigner::new(&config.auth.jwt_secret, config.auth.token_expiry_hours);

    // Realtime channel fan-out
    let channels = ChannelState::new();
    let publisher: ChannelPublisherService = Arc::new(channels.clone());

    // Initialize services
    let account_service = AccountService::new(
        user_repo.clone(),
        review_repo.clone(),
        group_repo.clone(),
        follow_repo.clone(),
        favorite_repo.clone(),
        film_repo.clone(),
        signer,
        config.environment.is_development(),
    );
    let friend_service = FriendService::new(
        friend_repo,
        follow_repo.clone(),
        user_repo.clone(),
        review_repo.clone(),
        group_repo.clone(),
    );
    let follow_service = FollowService::new(follow_repo, user_repo.clone());
    let notification_service = NotificationService::new(notification_repo);
    let group_service = GroupService::new(
        group_repo.clone(),
        user_repo.clone(),
        film_repo.clone(),
        notification_service.clone(),
    );
    let film_service = FilmService::new(film_repo.clone(), favorite_repo);
    let review_service = ReviewService::new(
        review_repo.clone(),
        review_like_repo,
        comment_reply_repo.clone(),
        film_repo.clone(),
        user_repo.clone(),
    );
    let moderation_service = ModerationService::new(
        moderation_repo,
        review_repo,
        comment_reply_repo,
        message_repo.clone(),
        user_repo.clone(),
        film_repo,
        group_repo.clone(),
    );
    let message_service = MessageService::new(message_repo, group_repo, user_repo, publisher);

    // Create app state
    let state = AppState {
        account_service,
        friend_service,
        follow_service,
        group_service,
        film_service,
        review_service,
        moderation_service,
        message_service,
        notification_service,
        channels,
    };

    // CORS: a single allowed browser origin from configuration
    let cors = match config.cors.allowed_origin.parse() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                origin = %config.cors.allowed_origin,
                "Invalid CORS origin, allowing any"
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    // Build router
    let app = Router::new()
        .route("/streaming", get(streaming_handler))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            reelhub_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
