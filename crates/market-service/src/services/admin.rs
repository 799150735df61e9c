//! Admin service
//!
//! Account administration: listing and the ban flag.

use market_core::{DomainError, Page, Role, Uid};
use tracing::{info, instrument};

use crate::dto::{AccountResponse, Paginated};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List accounts, optionally filtered by role
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        role: Option<Role>,
        page: Page,
    ) -> ServiceResult<Paginated<AccountResponse>> {
        let (accounts, total) = self.ctx.account_repo().list(role, page).await?;

        Ok(Paginated::new(
            accounts.iter().map(AccountResponse::from).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    /// Set or clear an account's ban flag. Admin accounts cannot be banned.
    #[instrument(skip(self))]
    pub async fn set_ban(&self, account_id: Uid, banned: bool) -> ServiceResult<AccountResponse> {
        let mut account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", account_id.to_string()))?;

        if banned && !account.can_be_banned() {
            return Err(ServiceError::Domain(DomainError::CannotBanAdmin));
        }

        self.ctx.account_repo().set_banned(account_id, banned).await?;
        account.banned = banned;

        info!(account_id = %account_id, banned, "Ban flag updated");

        Ok(AccountResponse::from(&account))
    }
}
