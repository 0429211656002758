use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chirp::{
    api::{create_router, AppState, RateLimiter},
    config::Config,
    db::SessionRepository,
    error::AppError,
    media::MediaClient,
    MIGRATOR,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chirp=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting chirp server v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    tracing::info!("✅ Configuration loaded");

    // Setup database with proper connection pooling
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let db = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(connect_options)
        .await?;

    tracing::info!("✅ Database connected: {}", config.database_url);

    // Run migrations
    MIGRATOR
        .run(&db)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

    tracing::info!("✅ Database migrations completed");

    // Create rate limiter (100 requests per minute per IP)
    let rate_limiter = Arc::new(RateLimiter::new(100, 60));
    tracing::info!("✅ Rate limiter configured (100 req/min per IP)");

    let media = MediaClient::from_config(&config);
    if config.media_upload_url.is_some() {
        tracing::info!("✅ Media upload host configured");
    } else {
        tracing::warn!("Media upload host not configured; only media URLs are accepted");
    }

    // Create shared application state
    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        media,
    };

    // Spawn background task for session cleanup
    {
        let db_clone = db.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600)); // Every hour
            loop {
                interval.tick().await;
                match SessionRepository::cleanup_expired(&db_clone).await {
                    Ok(_) => tracing::debug!("🧹 Expired sessions cleaned up"),
                    Err(e) => tracing::error!("❌ Session cleanup failed: {}", e),
                }
            }
        });
        tracing::info!("✅ Session cleanup task started (runs hourly)");
    }

    // Spawn background task for rate limiter cleanup
    {
        let limiter = rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300)); // Every 5 minutes
            loop {
                interval.tick().await;
                limiter.sweep().await;
                tracing::debug!("🧹 Rate limiter cache cleaned up");
            }
        });
        tracing::info!("✅ Rate limiter cleanup task started");
    }

    // Build router
    let app = create_router(state, rate_limiter);

    // Bind and serve
    let addr = config.server_address();
    tracing::info!("🌐 Server listening on http://{}", addr);
    tracing::info!("🏥 Health check: http://{}/api/health", addr);
    tracing::info!("");
    tracing::info!("📚 API Endpoints:");
    tracing::info!("  POST   /api/auth/register           - Register new user");
    tracing::info!("  POST   /api/auth/login              - Login with email + password");
    tracing::info!("  GET    /api/users/:id               - User profile (requires auth)");
    tracing::info!("  PUT    /api/users/:id/follow        - Follow a user (requires auth)");
    tracing::info!("  POST   /api/tweets                  - Post a tweet (requires auth)");
    tracing::info!("  GET    /api/tweets/timeline         - Timeline (requires auth)");
    tracing::info!("  PUT    /api/tweets/:id/like         - Like a tweet (requires auth)");
    tracing::info!("  POST   /api/tweets/:id/comment      - Comment on a tweet (requires auth)");
    tracing::info!("  GET    /api/notifications           - Notifications (requires auth)");
    tracing::info!("");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
