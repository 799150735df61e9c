//! Category handlers
//!
//! Public listing plus seller-owned category CRUD.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use market_service::{
    CategoryResponse, CategoryService, CreateCategoryRequest, UpdateCategoryRequest,
};
use serde::Deserialize;

use crate::extractors::{SellerAccount, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, Envelope, MessageEnvelope};
use crate::state::AppState;

/// Active-flag filter query
#[derive(Debug, Default, Deserialize)]
pub struct ActiveQuery {
    pub active: Option<bool>,
}

/// List all categories
///
/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ActiveQuery>,
) -> ApiResult<Json<Envelope<Vec<CategoryResponse>>>> {
    let service = CategoryService::new(state.service_context());
    let response = service.list(query.active).await?;
    Ok(Envelope::data(response))
}

/// List the calling seller's categories
///
/// GET /api/v1/seller/categories
pub async fn list_seller_categories(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Query(query): Query<ActiveQuery>,
) -> ApiResult<Json<Envelope<Vec<CategoryResponse>>>> {
    let service = CategoryService::new(state.service_context());
    let response = service.list_by_owner(auth.id, query.active).await?;
    Ok(Envelope::data(response))
}

/// Create a category
///
/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<Created<Json<Envelope<CategoryResponse>>>> {
    let service = CategoryService::new(state.service_context());
    let response = service.create(auth.id, request).await?;
    Ok(Created(Envelope::with_message(
        "Category created successfully",
        response,
    )))
}

/// Update a category
///
/// PATCH /api/v1/categories/{category_id}
pub async fn update_category(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Path(category_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<Json<Envelope<CategoryResponse>>> {
    let category_id = category_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid category id format"))?;

    let service = CategoryService::new(state.service_context());
    let response = service.update(auth.id, category_id, request).await?;
    Ok(Envelope::with_message("Category updated successfully", response))
}

/// Delete a category (blocked while products reference it)
///
/// DELETE /api/v1/categories/{category_id}
pub async fn delete_category(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Path(category_id): Path<String>,
) -> ApiResult<Json<MessageEnvelope>> {
    let category_id = category_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid category id format"))?;

    let service = CategoryService::new(state.service_context());
    service.delete(auth.id, category_id).await?;
    Ok(Envelope::message("Category deleted successfully"))
}
