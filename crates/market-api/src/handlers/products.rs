//! Public catalog handlers
//!
//! Product browsing, search, and detail. No authentication required.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use market_core::ProductFilter;
use market_service::{CatalogService, Paginated, ProductResponse, ReviewResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::extractors::PageQuery;
use crate::response::{ApiError, ApiResult, Envelope};
use crate::state::AppState;

/// Query parameters for the public product listing
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
}

/// Query parameters for product search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Product detail payload with its reviews
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: ProductResponse,
    pub reviews: Vec<ReviewResponse>,
}

/// List active products with filters
///
/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<Envelope<Paginated<ProductResponse>>>> {
    let filter = ProductFilter {
        category: query.category,
        min_price: query.min_price,
        max_price: query.max_price,
        tag: query.tag,
        featured: query.featured,
    };

    let service = CatalogService::new(state.service_context());
    let response = service.list_products(filter, page).await?;
    Ok(Envelope::data(response))
}

/// Free-text product search
///
/// GET /api/v1/products/search?q=
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<Envelope<Paginated<ProductResponse>>>> {
    let service = CatalogService::new(state.service_context());
    let response = service.search_products(&query.q, page).await?;
    Ok(Envelope::data(response))
}

/// Product detail with reviews
///
/// GET /api/v1/products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<Envelope<ProductDetail>>> {
    let product_id = product_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid product id format"))?;

    let service = CatalogService::new(state.service_context());
    let (product, reviews) = service.get_product(product_id).await?;
    Ok(Envelope::data(ProductDetail { product, reviews }))
}
