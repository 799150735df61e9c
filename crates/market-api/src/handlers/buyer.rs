//! Buyer handlers
//!
//! Order placement, order history, and reviews.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use market_core::OrderStatus;
use market_service::{
    CreateOrderRequest, CreateReviewRequest, OrderResponse, OrderService, Paginated,
    ReviewResponse, ReviewService,
};
use serde::{Deserialize, Serialize};

use crate::extractors::{BuyerAccount, PageQuery, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, Envelope};
use crate::state::AppState;

/// Status filter query
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<OrderStatus>,
}

/// Order detail payload with the review, if written
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order: OrderResponse,
    pub review: Option<ReviewResponse>,
}

/// Place an order
///
/// POST /api/v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    BuyerAccount(auth): BuyerAccount,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<Created<Json<Envelope<OrderResponse>>>> {
    let service = OrderService::new(state.service_context());
    let response = service.create_order(auth.id, request).await?;
    Ok(Created(Envelope::with_message(
        "Order created successfully",
        response,
    )))
}

/// The caller's orders
///
/// GET /api/v1/buyer/orders
pub async fn list_orders(
    State(state): State<AppState>,
    BuyerAccount(auth): BuyerAccount,
    Query(query): Query<StatusQuery>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<Envelope<Paginated<OrderResponse>>>> {
    let service = OrderService::new(state.service_context());
    let response = service
        .list_buyer_orders(auth.id, query.status, page)
        .await?;
    Ok(Envelope::data(response))
}

/// One of the caller's orders, with its review if any
///
/// GET /api/v1/buyer/orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    BuyerAccount(auth): BuyerAccount,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Envelope<OrderDetail>>> {
    let order_id = order_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid order id format"))?;

    let service = OrderService::new(state.service_context());
    let (order, review) = service.get_buyer_order(auth.id, order_id).await?;
    Ok(Envelope::data(OrderDetail { order, review }))
}

/// Review a completed order
///
/// POST /api/v1/buyer/orders/{order_id}/review
pub async fn create_review(
    State(state): State<AppState>,
    BuyerAccount(auth): BuyerAccount,
    Path(order_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> ApiResult<Created<Json<Envelope<ReviewResponse>>>> {
    let order_id = order_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid order id format"))?;

    let service = ReviewService::new(state.service_context());
    let response = service.create_review(auth.id, order_id, request).await?;
    Ok(Created(Envelope::with_message(
        "Review created successfully",
        response,
    )))
}
