use std::sync::Arc;

use tracing::info;

use crate::accounts::errors::AccountError;
use crate::accounts::password;
use crate::accounts::repo::AccountStore;
use crate::accounts::repo_types::{Account, AccountPatch, NewAccount};

/// Orchestrates account operations against the store, enforcing email
/// uniqueness on create and existence on read/update. Each call is one
/// independent unit of work; nothing is retried.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Register a new account. The pre-check gives the friendly duplicate
    /// error; the store's unique index stays the final arbiter of the
    /// check-then-insert race and reports the same `DuplicateEmail`.
    pub async fn create_account(
        &self,
        new_account: NewAccount,
        password: &str,
    ) -> Result<Account, AccountError> {
        if password.trim().is_empty() {
            return Err(AccountError::invalid_argument("Password cannot be null or empty"));
        }
        if self.store.fetch_by_email(&new_account.email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }
        let password_hash = password::hash_password(password)?;
        let account = self.store.create(new_account, &password_hash).await?;
        info!(account_id = account.id, email = %account.email, "account created");
        Ok(account)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Account, AccountError> {
        self.store.fetch_by_id(id).await?.ok_or(AccountError::NotFound)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Account, AccountError> {
        self.store.fetch_by_email(email).await?.ok_or(AccountError::NotFound)
    }

    /// Replace exactly email, full name and role on an existing account.
    /// `id`, `created_at` and `password_hash` are never touched. Uniqueness
    /// is not re-checked here; a collision surfaces as the store's own error.
    pub async fn update_account(
        &self,
        id: i64,
        patch: AccountPatch,
    ) -> Result<Account, AccountError> {
        let mut existing = self.store.fetch_by_id(id).await?.ok_or(AccountError::NotFound)?;
        existing.email = patch.email;
        existing.full_name = patch.full_name;
        existing.role = patch.role;
        self.store.update(&existing).await?;
        info!(account_id = existing.id, "account updated");
        Ok(existing)
    }

    /// Check a candidate password against the account's stored hash.
    pub fn validate_password(
        &self,
        account: &Account,
        password: &str,
    ) -> Result<bool, AccountError> {
        if password.trim().is_empty() {
            return Err(AccountError::invalid_argument("Password cannot be null or empty"));
        }
        password::verify_password(password, &account.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::repo_types::Role;
    use crate::accounts::testing::{mem_service, new_account};

    #[tokio::test]
    async fn create_account_hashes_and_persists() {
        let (service, store) = mem_service();
        let account = service
            .create_account(new_account("a@x.com", "A", Role::Student), "secret123")
            .await
            .expect("create account");
        assert!(account.id > 0);
        assert_ne!(account.password_hash, "secret123");
        assert!(account.password_hash.starts_with("$argon2"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn create_account_rejects_duplicate_email_and_leaves_store_unchanged() {
        let (service, store) = mem_service();
        service
            .create_account(new_account("a@x.com", "A", Role::Student), "secret123")
            .await
            .expect("first create");
        let err = service
            .create_account(new_account("a@x.com", "B", Role::Mentor), "other-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateEmail));
        assert_eq!(err.to_string(), "Email is already taken");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn create_account_rejects_blank_password() {
        let (service, store) = mem_service();
        let err = service
            .create_account(new_account("a@x.com", "A", Role::Student), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidArgument(_)));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn created_account_verifies_against_original_plaintext() {
        let (service, _) = mem_service();
        service
            .create_account(new_account("a@x.com", "A", Role::Student), "secret123")
            .await
            .expect("create account");
        let fetched = service.get_by_email("a@x.com").await.expect("get by email");
        assert!(service.validate_password(&fetched, "secret123").unwrap());
        assert!(!service.validate_password(&fetched, "wrong").unwrap());
    }

    #[tokio::test]
    async fn get_by_id_missing_is_not_found() {
        let (service, _) = mem_service();
        let err = service.get_by_id(42).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn get_by_email_missing_is_not_found() {
        let (service, _) = mem_service();
        let err = service.get_by_email("ghost@x.com").await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[tokio::test]
    async fn email_lookup_is_exact_match() {
        let (service, _) = mem_service();
        service
            .create_account(new_account("a@x.com", "A", Role::Student), "secret123")
            .await
            .expect("create account");
        let err = service.get_by_email("A@X.COM").await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[tokio::test]
    async fn update_replaces_profile_fields_only() {
        let (service, _) = mem_service();
        let created = service
            .create_account(new_account("a@x.com", "A", Role::Student), "secret123")
            .await
            .expect("create account");

        let updated = service
            .update_account(
                created.id,
                AccountPatch {
                    email: "b@x.com".into(),
                    full_name: "B".into(),
                    role: Role::Mentor,
                },
            )
            .await
            .expect("update account");

        assert_eq!(updated.email, "b@x.com");
        assert_eq!(updated.full_name, "B");
        assert_eq!(updated.role, Role::Mentor);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.password_hash, created.password_hash);

        let fetched = service.get_by_id(created.id).await.expect("get by id");
        assert_eq!(fetched.email, "b@x.com");
        assert_eq!(fetched.password_hash, created.password_hash);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (service, _) = mem_service();
        let err = service
            .update_account(
                9000,
                AccountPatch {
                    email: "b@x.com".into(),
                    full_name: "B".into(),
                    role: Role::Student,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[tokio::test]
    async fn validate_password_rejects_blank_candidate() {
        let (service, _) = mem_service();
        let account = service
            .create_account(new_account("a@x.com", "A", Role::Student), "secret123")
            .await
            .expect("create account");
        let err = service.validate_password(&account, "   ").unwrap_err();
        assert!(matches!(err, AccountError::InvalidArgument(_)));
    }
}
