//! Account Directory — the mock user database behind login/registration.
//!
//! Explicitly a demo-grade directory: plaintext password comparison, no
//! hashing, no rate limiting. The session account lives in the store
//! behind accessors on this type, never as an ambient global.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::PortalError;
use crate::store::{keys, SharedStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    /// Plaintext, mock only. A real directory must not carry this forward.
    pub password: String,
    pub name: String,
    pub role: Role,
    pub company: String,
    pub department: String,
}

#[derive(Clone)]
pub struct AccountDirectory {
    store: SharedStore,
}

impl AccountDirectory {
    /// Opens the directory, seeding the demo accounts on first use.
    pub fn new(store: SharedStore) -> Self {
        let directory = Self { store };
        if directory.store.get(keys::USERS_DB).is_none() {
            info!("No account directory found; seeding demo accounts");
            directory.write_all(&demo_accounts());
        }
        directory
    }

    /// Registers a new account. Unlike the original portal, duplicate
    /// emails are rejected rather than silently appended.
    pub fn register(&self, account: Account) -> Result<(), PortalError> {
        let mut accounts = self.all();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(PortalError::DuplicateEmail(account.email));
        }
        debug!("Registering account {}", account.email);
        accounts.push(account);
        self.write_all(&accounts);
        Ok(())
    }

    /// Exact email+password match, or `InvalidCredentials`. On success the
    /// account becomes the current session user.
    pub fn login(&self, email: &str, password: &str) -> Result<Account, PortalError> {
        let account = self
            .all()
            .into_iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or(PortalError::InvalidCredentials)?;

        info!("Login for {}", account.email);
        match serde_json::to_string(&account) {
            Ok(json) => self.store.set(keys::SESSION_USER, &json),
            Err(e) => warn!("Failed to persist session user: {e}"),
        }
        Ok(account)
    }

    /// Clears the session reference. Idempotent.
    pub fn logout(&self) {
        self.store.remove(keys::SESSION_USER);
    }

    /// The logged-in account, restored from the store if previously persisted.
    pub fn current_user(&self) -> Option<Account> {
        let json = self.store.get(keys::SESSION_USER)?;
        match serde_json::from_str(&json) {
            Ok(account) => Some(account),
            Err(e) => {
                warn!("Stored session user is corrupt ({e}); treating as logged out");
                None
            }
        }
    }

    /// Full directory listing, insertion order. Used by admin views.
    pub fn all(&self) -> Vec<Account> {
        let Some(json) = self.store.get(keys::USERS_DB) else {
            return Vec::new();
        };
        match serde_json::from_str(&json) {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("Account directory is corrupt ({e}); treating as empty");
                Vec::new()
            }
        }
    }

    fn write_all(&self, accounts: &[Account]) {
        match serde_json::to_string(accounts) {
            Ok(json) => self.store.set(keys::USERS_DB, &json),
            Err(e) => warn!("Failed to persist account directory: {e}"),
        }
    }
}

/// The three demo accounts the original portal ships with.
fn demo_accounts() -> Vec<Account> {
    vec![
        Account {
            email: "admin@skillup.com".into(),
            password: "admin".into(),
            name: "Admin User".into(),
            role: Role::Admin,
            company: "SkillUp Corp".into(),
            department: "HR".into(),
        },
        Account {
            email: "sumit@gmail.com".into(),
            password: "qwerty".into(),
            name: "Sumit Gupta".into(),
            role: Role::Employee,
            company: "SkillUp Corp".into(),
            department: "Engineering".into(),
        },
        Account {
            email: "demo@skillup.com".into(),
            password: "123".into(),
            name: "Demo User".into(),
            role: Role::Employee,
            company: "SkillUp Corp".into(),
            department: "Design".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn directory() -> AccountDirectory {
        AccountDirectory::new(Arc::new(MemoryStore::new()))
    }

    fn alice() -> Account {
        Account {
            email: "alice@co.com".into(),
            password: "pw1".into(),
            name: "Alice".into(),
            role: Role::Employee,
            company: "Co".into(),
            department: "Engineering".into(),
        }
    }

    #[test]
    fn test_seeds_demo_accounts() {
        let dir = directory();
        let accounts = dir.all();
        assert_eq!(accounts.len(), 3);
        assert!(accounts.iter().any(|a| a.email == "admin@skillup.com"));
    }

    #[test]
    fn test_register_then_login() {
        let dir = directory();
        dir.register(alice()).unwrap();

        let account = dir.login("alice@co.com", "pw1").unwrap();
        assert_eq!(account.email, "alice@co.com");
    }

    #[test]
    fn test_login_wrong_password() {
        let dir = directory();
        dir.register(alice()).unwrap();

        let err = dir.login("alice@co.com", "wrong").unwrap_err();
        assert!(matches!(err, PortalError::InvalidCredentials));
    }

    #[test]
    fn test_login_unknown_email() {
        let dir = directory();
        let err = dir.login("nobody@co.com", "pw").unwrap_err();
        assert!(matches!(err, PortalError::InvalidCredentials));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let dir = directory();
        dir.register(alice()).unwrap();

        let err = dir.register(alice()).unwrap_err();
        assert!(matches!(err, PortalError::DuplicateEmail(_)));
        assert_eq!(dir.all().len(), 4); // 3 seeds + alice, not 5
    }

    #[test]
    fn test_session_restored_from_store() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let dir = AccountDirectory::new(Arc::clone(&store));
        dir.register(alice()).unwrap();
        dir.login("alice@co.com", "pw1").unwrap();

        // A fresh directory over the same store sees the session.
        let dir2 = AccountDirectory::new(store);
        assert_eq!(dir2.current_user().unwrap().email, "alice@co.com");
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = directory();
        dir.login("demo@skillup.com", "123").unwrap();
        dir.logout();
        dir.logout();
        assert!(dir.current_user().is_none());
    }
}
