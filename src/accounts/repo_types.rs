use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Account role. Stored lowercase in Postgres, exposed as the PascalCase
/// variant name ("Student") in JSON and token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mentor,
    Student,
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

/// Account record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,                    // store-assigned, immutable
    pub email: String,              // unique, exact-match equality
    #[serde(skip_serializing)]
    pub password_hash: String,      // argon2 PHC string, not exposed in JSON
    pub full_name: String,
    pub role: Role,
    pub created_at: OffsetDateTime, // set by the store at insert
}

/// Fields the caller supplies when creating an account. The store assigns
/// `id` and `created_at`; the service computes the hash.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Replacement values for an update. `id`, `created_at` and `password_hash`
/// are never touched by an update.
#[derive(Debug, Clone)]
pub struct AccountPatch {
    pub email: String,
    pub full_name: String,
    pub role: Role,
}
