//! Authentication service
//!
//! Handles registration, login, token refresh, profile access, and the
//! password-reset flow.

use chrono::{Duration, Utc};
use market_common::auth::{
    generate_reset_token, hash_password, hash_reset_token, validate_password_strength,
    verify_password,
};
use market_common::AppError;
use market_core::{Account, Role, Uid};
use market_notify::Notification;
use tracing::{info, instrument, warn};

use crate::dto::{
    AccountResponse, AuthResponse, ForgotPasswordRequest, LoginRequest, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// How long a password-reset token stays valid
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new buyer or seller account
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let role = request.role.unwrap_or(Role::Buyer);
        if !role.is_registerable() {
            return Err(ServiceError::validation(
                "Only buyer and seller accounts can be registered",
            ));
        }

        validate_password_strength(&request.password).map_err(ServiceError::from)?;

        if self.ctx.account_repo().email_exists(&request.email).await? {
            return Err(ServiceError::conflict("Email already registered"));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        let mut account = Account::new(
            self.ctx.generate_id(),
            request.name,
            request.email,
            role,
        );
        account.phone = request.phone;
        account.address = request.address;

        self.ctx
            .account_repo()
            .create(&account, &password_hash)
            .await?;

        info!(account_id = %account.id, role = %role, "Account registered successfully");

        self.issue_tokens(&account)
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed: account not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if account.banned {
            warn!(account_id = %account.id, "Login rejected: account banned");
            return Err(ServiceError::App(AppError::AccountBanned));
        }

        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %account.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let is_valid = verify_password(&request.password, &password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        if !is_valid {
            warn!(account_id = %account.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        info!(account_id = %account.id, "Login successful");

        self.issue_tokens(&account)
    }

    /// Exchange a refresh token for a fresh pair
    ///
    /// Re-checks that the account still exists and is not banned.
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)
            .map_err(ServiceError::from)?;

        let account_id = claims.account_id().map_err(ServiceError::from)?;

        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        if account.banned {
            return Err(ServiceError::App(AppError::AccountBanned));
        }

        info!(account_id = %account.id, "Tokens refreshed");

        self.issue_tokens(&account)
    }

    /// Current account profile
    #[instrument(skip(self))]
    pub async fn current_account(&self, account_id: Uid) -> ServiceResult<AccountResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", account_id.to_string()))?;

        Ok(AccountResponse::from(&account))
    }

    /// Update the caller's contact details
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        account_id: Uid,
        request: UpdateProfileRequest,
    ) -> ServiceResult<AccountResponse> {
        let mut account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", account_id.to_string()))?;

        if let Some(name) = request.name {
            account.name = name;
        }
        account.set_contact(request.phone, request.address);

        self.ctx.account_repo().update(&account).await?;

        Ok(AccountResponse::from(&account))
    }

    /// Start the password-reset flow.
    ///
    /// Always reports success to the caller, whether or not the email maps
    /// to an account. When it does, a single-use token (1 hour) is stored
    /// as a digest and its raw form is delivered synchronously; delivery
    /// failure clears the token and errors, since the account would be
    /// left holding a token nobody received.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> ServiceResult<()> {
        let Some(account) = self
            .ctx
            .account_repo()
            .find_by_email(&request.email)
            .await?
        else {
            // Do not reveal which emails exist
            return Ok(());
        };

        let (raw_token, digest) = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        self.ctx
            .account_repo()
            .set_reset_token(account.id, &digest, expires_at)
            .await?;

        let message = Notification::PasswordReset {
            to: account.email.clone(),
            name: account.name.clone(),
            reset_token: raw_token,
        }
        .to_message(self.ctx.dispatcher().sender());

        if let Err(e) = self.ctx.notifier().send(&message).await {
            warn!(account_id = %account.id, error = %e, "Password reset delivery failed");
            self.ctx.account_repo().clear_reset_token(account.id).await?;
            return Err(ServiceError::App(AppError::ExternalService(
                "Email could not be sent. Please try again later.".to_string(),
            )));
        }

        info!(account_id = %account.id, "Password reset token issued");
        Ok(())
    }

    /// Complete the password-reset flow with a raw token
    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ServiceResult<()> {
        validate_password_strength(&request.password).map_err(ServiceError::from)?;

        let digest = hash_reset_token(&request.token);

        let account = self
            .ctx
            .account_repo()
            .find_by_reset_token(&digest)
            .await?
            .ok_or_else(|| ServiceError::validation("Invalid or expired reset token"))?;

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        self.ctx
            .account_repo()
            .update_password(account.id, &password_hash)
            .await?;
        self.ctx.account_repo().clear_reset_token(account.id).await?;

        info!(account_id = %account.id, "Password reset completed");
        Ok(())
    }

    fn issue_tokens(&self, account: &Account) -> ServiceResult<AuthResponse> {
        let pair = self
            .ctx
            .jwt_service()
            .generate_token_pair(account.id, account.role)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        Ok(AuthResponse::new(
            pair.access_token,
            pair.refresh_token,
            pair.expires_in,
            AccountResponse::from(account),
        ))
    }
}
