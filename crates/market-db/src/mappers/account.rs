//! Account entity <-> model mapper

use market_core::{Account, DomainError, Role, Uid};

use crate::models::AccountModel;

impl TryFrom<AccountModel> for Account {
    type Error = DomainError;

    fn try_from(model: AccountModel) -> Result<Self, Self::Error> {
        let role: Role = model
            .role
            .parse()
            .map_err(|_| DomainError::DatabaseError(format!("invalid role value: {}", model.role)))?;

        Ok(Account {
            id: Uid::new(model.id),
            name: model.name,
            email: model.email,
            role,
            phone: model.phone,
            address: model.address,
            banned: model.banned,
            password_reset_token: model.password_reset_token,
            password_reset_expires: model.password_reset_expires,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(role: &str) -> AccountModel {
        AccountModel {
            id: 1,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: role.to_string(),
            phone: None,
            address: None,
            banned: false,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_maps_role() {
        let account = Account::try_from(model("seller")).unwrap();
        assert_eq!(account.role, Role::Seller);
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(Account::try_from(model("superuser")).is_err());
    }
}
