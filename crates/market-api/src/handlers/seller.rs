//! Seller handlers
//!
//! Dashboard, product management, media uploads, and order fulfillment.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use market_service::{
    CreateProductRequest, DashboardService, OrderResponse, OrderService, Paginated,
    ProductResponse, SellerDashboardResponse, UpdateOrderStatusRequest, UpdateProductRequest,
    CatalogService,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extractors::{PageQuery, SellerAccount, ValidatedJson};
use crate::handlers::buyer::StatusQuery;
use crate::response::{ApiError, ApiResult, Created, Envelope, MessageEnvelope};
use crate::state::AppState;

/// Active-flag filter for the seller's product list
#[derive(Debug, Default, Deserialize)]
pub struct SellerProductQuery {
    pub active: Option<bool>,
}

/// Upload result payload
#[derive(Debug, Serialize)]
pub struct UploadedMedia {
    pub urls: Vec<String>,
}

/// Seller dashboard
///
/// GET /api/v1/seller/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
) -> ApiResult<Json<Envelope<SellerDashboardResponse>>> {
    let service = DashboardService::new(state.service_context());
    let response = service.seller_dashboard(auth.id).await?;
    Ok(Envelope::data(response))
}

/// The caller's products
///
/// GET /api/v1/seller/products
pub async fn list_products(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Query(query): Query<SellerProductQuery>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<Envelope<Paginated<ProductResponse>>>> {
    let service = CatalogService::new(state.service_context());
    let response = service
        .list_seller_products(auth.id, query.active, page)
        .await?;
    Ok(Envelope::data(response))
}

/// Create a product
///
/// POST /api/v1/seller/products
pub async fn create_product(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> ApiResult<Created<Json<Envelope<ProductResponse>>>> {
    let service = CatalogService::new(state.service_context());
    let response = service.create_product(auth.id, request).await?;
    Ok(Created(Envelope::with_message(
        "Product created successfully",
        response,
    )))
}

/// Update a product
///
/// PATCH /api/v1/seller/products/{product_id}
pub async fn update_product(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Path(product_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<Json<Envelope<ProductResponse>>> {
    let product_id = product_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid product id format"))?;

    let service = CatalogService::new(state.service_context());
    let response = service.update_product(auth.id, product_id, request).await?;
    Ok(Envelope::with_message("Product updated successfully", response))
}

/// Delete a product
///
/// DELETE /api/v1/seller/products/{product_id}
pub async fn delete_product(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Path(product_id): Path<String>,
) -> ApiResult<Json<MessageEnvelope>> {
    let product_id = product_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid product id format"))?;

    let service = CatalogService::new(state.service_context());
    service.delete_product(auth.id, product_id).await?;
    Ok(Envelope::message("Product deleted successfully"))
}

/// Upload media files; responds with the durable URLs to reference from
/// product records
///
/// POST /api/v1/seller/uploads
pub async fn upload_media(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    mut multipart: Multipart,
) -> ApiResult<Created<Json<Envelope<UploadedMedia>>>> {
    let mut urls = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_query(e.to_string()))?
    {
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        let url = state
            .media_store()
            .store(&original_name, &content_type, bytes.to_vec())
            .await
            .map_err(|e| match e {
                crate::storage::MediaError::UnsupportedType(t) => {
                    ApiError::invalid_query(format!("Unsupported media type: {t}"))
                }
                crate::storage::MediaError::Io(io) => {
                    warn!(seller_id = %auth.id, error = %io, "Media write failed");
                    ApiError::internal(io)
                }
            })?;

        urls.push(url);
    }

    if urls.is_empty() {
        return Err(ApiError::invalid_query("No files in upload"));
    }

    Ok(Created(Envelope::data(UploadedMedia { urls })))
}

/// The caller's orders
///
/// GET /api/v1/seller/orders
pub async fn list_orders(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Query(query): Query<StatusQuery>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<Envelope<Paginated<OrderResponse>>>> {
    let service = OrderService::new(state.service_context());
    let response = service
        .list_seller_orders(auth.id, query.status, page)
        .await?;
    Ok(Envelope::data(response))
}

/// Move an order through its status lifecycle
///
/// PATCH /api/v1/seller/orders/{order_id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    SellerAccount(auth): SellerAccount,
    Path(order_id): Path<String>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Json<Envelope<OrderResponse>>> {
    let order_id = order_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid order id format"))?;

    let service = OrderService::new(state.service_context());
    let response = service
        .update_status(auth.id, order_id, request.status)
        .await?;
    Ok(Envelope::with_message(
        "Order status updated successfully",
        response,
    ))
}
