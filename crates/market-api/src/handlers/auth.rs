//! Authentication handlers
//!
//! Registration, login, token refresh, profile, and password reset.

use axum::{extract::State, Json};
use market_service::{
    AccountResponse, AuthResponse, AuthService, ForgotPasswordRequest, LoginRequest,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

use crate::extractors::{AuthAccount, ValidatedJson};
use crate::response::{ApiResult, Created, Envelope, MessageEnvelope};
use crate::state::AppState;

/// Register a new buyer or seller account
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<Envelope<AuthResponse>>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Envelope::with_message(
        "Account registered successfully",
        response,
    )))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Envelope::with_message("Login successful", response))
}

/// Refresh the token pair
///
/// POST /api/v1/auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<Envelope<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh_tokens(request).await?;
    Ok(Envelope::data(response))
}

/// Logout. Tokens are stateless; the client discards them.
///
/// POST /api/v1/auth/logout
pub async fn logout() -> Json<MessageEnvelope> {
    Envelope::message("Logged out successfully")
}

/// Current account profile
///
/// GET /api/v1/auth/me
pub async fn current_account(
    State(state): State<AppState>,
    auth: AuthAccount,
) -> ApiResult<Json<Envelope<AccountResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_account(auth.id).await?;
    Ok(Envelope::data(response))
}

/// Update the caller's profile
///
/// PATCH /api/v1/auth/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthAccount,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<Envelope<AccountResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.update_profile(auth.id, request).await?;
    Ok(Envelope::with_message("Profile updated successfully", response))
}

/// Start the password-reset flow
///
/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageEnvelope>> {
    let service = AuthService::new(state.service_context());
    service.forgot_password(request).await?;
    Ok(Envelope::message(
        "If the email exists, a password reset link has been sent.",
    ))
}

/// Complete the password-reset flow
///
/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageEnvelope>> {
    let service = AuthService::new(state.service_context());
    service.reset_password(request).await?;
    Ok(Envelope::message(
        "Password reset successful. You can now login with your new password.",
    ))
}
