//! Server setup and initialization
//!
//! Provides the application builder and server runner. Every dependency
//! (pool, repositories, JWT, id generator, notification dispatcher, media
//! store) is constructed here and injected; nothing lives in globals.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use market_common::{AppConfig, AppError, JwtService};
use market_core::UidGenerator;
use market_db::{
    create_pool, PgAccountRepository, PgCategoryRepository, PgOrderRepository,
    PgProductRepository, PgReviewRepository,
};
use market_notify::{build_notifier, NotificationDispatcher};
use market_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;
use crate::storage::LocalMediaStore;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    let api = create_router(&config.storage.upload_dir, config.storage.max_file_size_mb);
    let api = apply_middleware(
        api,
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    // Health stays outside the rate limiter
    api.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = market_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    // Create id generator
    let uid_generator = Arc::new(UidGenerator::new(config.id_gen.worker_id));

    // Notification plumbing: the dispatcher queues fire-and-forget events,
    // the bare notifier serves the synchronous password-reset send.
    let notifier = build_notifier(&config.notifier);
    let dispatcher = NotificationDispatcher::spawn(
        Arc::clone(&notifier),
        &config.notifier.sender,
        config.notifier.queue_capacity,
        config.notifier.max_in_flight,
        std::time::Duration::from_secs(config.notifier.timeout_secs),
    );

    // Create repositories
    let account_repo = Arc::new(PgAccountRepository::new(pool.clone()));
    let product_repo = Arc::new(PgProductRepository::new(pool.clone()));
    let category_repo = Arc::new(PgCategoryRepository::new(pool.clone()));
    let order_repo = Arc::new(PgOrderRepository::new(pool.clone()));
    let review_repo = Arc::new(PgReviewRepository::new(pool));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .account_repo(account_repo)
        .product_repo(product_repo)
        .category_repo(category_repo)
        .order_repo(order_repo)
        .review_repo(review_repo)
        .jwt_service(jwt_service)
        .uid_generator(uid_generator)
        .dispatcher(dispatcher)
        .notifier(notifier)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Media store
    let media_store = Arc::new(LocalMediaStore::new(&config.storage));

    Ok(AppState::new(service_context, config, media_store))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
