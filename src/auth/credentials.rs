//! # Credential Store
//!
//! Checks login credentials. Accounts come from configuration; nothing is
//! hardcoded.

use serde::{Deserialize, Serialize};

use super::crypto::{constant_time_eq, verify_password};
use super::errors::{AuthError, AuthResult};

/// A configured account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,
}

/// Verifies email/password pairs
pub trait CredentialStore: Send + Sync {
    /// Return the canonical email of the matching account
    fn authenticate(&self, email: &str, password: &str) -> AuthResult<String>;
}

/// Fixed list of accounts loaded at startup
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    accounts: Vec<Account>,
}

impl StaticCredentialStore {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn authenticate(&self, email: &str, password: &str) -> AuthResult<String> {
        let email = email.trim().to_lowercase();

        // Walk every account so timing does not reveal which emails exist
        let mut found: Option<&Account> = None;
        for account in &self.accounts {
            if constant_time_eq(&account.email.to_lowercase(), &email) {
                found = Some(account);
            }
        }

        let account = found.ok_or(AuthError::InvalidCredentials)?;
        if verify_password(password, &account.password_hash)? {
            Ok(account.email.clone())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
