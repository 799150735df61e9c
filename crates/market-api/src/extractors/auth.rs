//! Authentication extractors - the access gateway
//!
//! Verifies the bearer token, resolves it to an account, rejects banned
//! accounts, and gates role-restricted routes by exact role match.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use market_common::AppError;
use market_core::{Account, Role, Uid};

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated account, resolved from the access token.
///
/// The token carries (account id, role); the account itself is loaded so
/// bans take effect immediately rather than at token expiry.
#[derive(Debug, Clone)]
pub struct AuthAccount {
    pub id: Uid,
    pub role: Role,
    pub account: Account,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let claims = app_state
            .jwt_service()
            .validate_access_token(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::InvalidAuth
            })?;

        let account_id = claims.account_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid account id in token");
            ApiError::InvalidAuth
        })?;

        let account = app_state
            .service_context()
            .account_repo()
            .find_by_id(account_id)
            .await
            .map_err(|e| ApiError::App(AppError::Domain(e)))?
            .ok_or(ApiError::InvalidAuth)?;

        if account.banned {
            return Err(ApiError::App(AppError::AccountBanned));
        }

        Ok(AuthAccount {
            id: account.id,
            role: account.role,
            account,
        })
    }
}

/// Role gate helper: exact match against the allowed role
fn require_role(auth: AuthAccount, allowed: Role) -> Result<AuthAccount, ApiError> {
    if auth.role == allowed {
        Ok(auth)
    } else {
        Err(ApiError::App(AppError::InsufficientPermissions))
    }
}

macro_rules! role_extractor {
    ($name:ident, $role:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthAccount);

        #[async_trait]
        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
            AppState: FromRef<S>,
        {
            type Rejection = ApiError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let auth = AuthAccount::from_request_parts(parts, state).await?;
                require_role(auth, $role).map($name)
            }
        }
    };
}

role_extractor!(BuyerAccount, Role::Buyer, "Authenticated buyer");
role_extractor!(SellerAccount, Role::Seller, "Authenticated seller");
role_extractor!(AdminAccount, Role::Admin, "Authenticated admin");

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(role: Role) -> AuthAccount {
        let account = Account {
            id: Uid::new(1),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
            phone: None,
            address: None,
            banned: false,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        AuthAccount {
            id: account.id,
            role,
            account,
        }
    }

    #[test]
    fn test_role_gate_exact_match() {
        assert!(require_role(account(Role::Seller), Role::Seller).is_ok());
        assert!(require_role(account(Role::Buyer), Role::Seller).is_err());
        // Admin does not implicitly pass other gates
        assert!(require_role(account(Role::Admin), Role::Seller).is_err());
    }
}
