//! Admin handlers
//!
//! Account administration and the marketplace-wide dashboard.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use market_core::Role;
use market_service::{
    AccountResponse, AdminDashboardResponse, AdminService, BanRequest, DashboardService,
    Paginated,
};
use serde::Deserialize;

use crate::extractors::{AdminAccount, PageQuery};
use crate::response::{ApiError, ApiResult, Envelope};
use crate::state::AppState;

/// Role filter query
#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<Role>,
}

/// List all accounts
///
/// GET /api/v1/admin/users
pub async fn list_accounts(
    State(state): State<AppState>,
    AdminAccount(_auth): AdminAccount,
    Query(query): Query<RoleQuery>,
    PageQuery(page): PageQuery,
) -> ApiResult<Json<Envelope<Paginated<AccountResponse>>>> {
    let service = AdminService::new(state.service_context());
    let response = service.list_accounts(query.role, page).await?;
    Ok(Envelope::data(response))
}

/// Ban or unban an account
///
/// PATCH /api/v1/admin/users/{account_id}/ban
pub async fn set_ban(
    State(state): State<AppState>,
    AdminAccount(_auth): AdminAccount,
    Path(account_id): Path<String>,
    Json(request): Json<BanRequest>,
) -> ApiResult<Json<Envelope<AccountResponse>>> {
    let account_id = account_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid account id format"))?;

    let service = AdminService::new(state.service_context());
    let response = service.set_ban(account_id, request.banned).await?;

    let message = if request.banned {
        "Account banned successfully"
    } else {
        "Account unbanned successfully"
    };
    Ok(Envelope::with_message(message, response))
}

/// Marketplace-wide dashboard
///
/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    AdminAccount(_auth): AdminAccount,
) -> ApiResult<Json<Envelope<AdminDashboardResponse>>> {
    let service = DashboardService::new(state.service_context());
    let response = service.admin_dashboard().await?;
    Ok(Envelope::data(response))
}
