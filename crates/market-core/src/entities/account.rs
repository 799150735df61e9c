//! Account entity - a marketplace user (buyer, seller, or admin)

use chrono::{DateTime, Utc};

use crate::value_objects::{Role, Uid};

/// Marketplace account. The credential hash lives in the store, not here;
/// it is passed alongside the entity on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub banned: bool,
    /// SHA-256 digest of the outstanding password-reset token, if any
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new Account with required fields
    pub fn new(id: Uid, name: String, email: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            role,
            phone: None,
            address: None,
            banned: false,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the account may authenticate
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.banned
    }

    /// Admins cannot be banned
    #[inline]
    pub fn can_be_banned(&self) -> bool {
        !self.role.is_admin()
    }

    /// Whether the stored reset token digest is still inside its window
    pub fn reset_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.password_reset_token, self.password_reset_expires) {
            (Some(_), Some(expires)) => expires > now,
            _ => false,
        }
    }

    /// Update contact details
    pub fn set_contact(&mut self, phone: Option<String>, address: Option<String>) {
        if phone.is_some() {
            self.phone = phone;
        }
        if address.is_some() {
            self.address = address;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_account(role: Role) -> Account {
        Account::new(
            Uid::new(1),
            "Test User".to_string(),
            "test@example.com".to_string(),
            role,
        )
    }

    #[test]
    fn test_new_account_is_active() {
        let account = test_account(Role::Buyer);
        assert!(account.is_active());
        assert!(!account.banned);
    }

    #[test]
    fn test_admin_cannot_be_banned() {
        assert!(test_account(Role::Buyer).can_be_banned());
        assert!(test_account(Role::Seller).can_be_banned());
        assert!(!test_account(Role::Admin).can_be_banned());
    }

    #[test]
    fn test_reset_token_window() {
        let mut account = test_account(Role::Buyer);
        let now = Utc::now();
        assert!(!account.reset_token_valid_at(now));

        account.password_reset_token = Some("digest".to_string());
        account.password_reset_expires = Some(now + Duration::hours(1));
        assert!(account.reset_token_valid_at(now));
        assert!(!account.reset_token_valid_at(now + Duration::hours(2)));
    }

    #[test]
    fn test_set_contact_keeps_existing_when_none() {
        let mut account = test_account(Role::Buyer);
        account.set_contact(Some("0123456".to_string()), None);
        assert_eq!(account.phone.as_deref(), Some("0123456"));
        assert!(account.address.is_none());

        account.set_contact(None, Some("12 Market St".to_string()));
        assert_eq!(account.phone.as_deref(), Some("0123456"));
        assert_eq!(account.address.as_deref(), Some("12 Market St"));
    }
}
