//! Route definitions
//!
//! All API routes organized by surface and mounted under /api/v1. Uploaded
//! media is served from /uploads.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::handlers::{admin, auth, buyer, categories, health, products, seller};
use crate::state::AppState;

/// Create the main API router (excluding health, which bypasses rate
/// limiting)
pub fn create_router(upload_dir: &str, max_upload_mb: u32) -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_routes(max_upload_mb))
        .nest_service("/uploads", ServeDir::new(upload_dir))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes(max_upload_mb: u32) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(category_routes())
        .merge(buyer_routes())
        .merge(seller_routes(max_upload_mb))
        .merge(admin_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::current_account))
        .route("/auth/me", patch(auth::update_profile))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
}

/// Public catalog routes
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/search", get(products::search_products))
        .route("/products/:product_id", get(products::get_product))
}

/// Category routes (public listing, seller-gated mutation)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list_categories))
        .route("/categories", post(categories::create_category))
        .route("/categories/:category_id", patch(categories::update_category))
        .route("/categories/:category_id", delete(categories::delete_category))
}

/// Buyer routes
fn buyer_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(buyer::create_order))
        .route("/buyer/orders", get(buyer::list_orders))
        .route("/buyer/orders/:order_id", get(buyer::get_order))
        .route("/buyer/orders/:order_id/review", post(buyer::create_review))
}

/// Seller routes
fn seller_routes(max_upload_mb: u32) -> Router<AppState> {
    let upload_limit = usize::try_from(max_upload_mb).unwrap_or(10) * 1024 * 1024;

    Router::new()
        .route("/seller/dashboard", get(seller::dashboard))
        .route("/seller/categories", get(categories::list_seller_categories))
        .route("/seller/products", get(seller::list_products))
        .route("/seller/products", post(seller::create_product))
        .route("/seller/products/:product_id", patch(seller::update_product))
        .route("/seller/products/:product_id", delete(seller::delete_product))
        .route(
            "/seller/uploads",
            post(seller::upload_media).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/seller/orders", get(seller::list_orders))
        .route(
            "/seller/orders/:order_id/status",
            patch(seller::update_order_status),
        )
}

/// Admin routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin::list_accounts))
        .route("/admin/users/:account_id/ban", patch(admin::set_ban))
        .route("/admin/dashboard", get(admin::dashboard))
}
