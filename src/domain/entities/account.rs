use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ───── Database Models ───────────────────────────────────────────────

/// Caller capability, stored as uppercase varchar and carried on requests
/// by the trusted role header. Checks always match on the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "varchar", rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Moderator,
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("user") {
            Ok(Role::User)
        } else if s.eq_ignore_ascii_case("moderator") {
            Ok(Role::Moderator)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "USER",
            Role::Moderator => "MODERATOR",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct AccountInsert {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── API Request Models ────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAccountRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Must be at least 8 characters"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

impl RegisterAccountRequest {
    pub fn prepare_for_insert(&self, password_hash: String) -> AccountInsert {
        AccountInsert {
            email: self.email.clone(),
            password_hash,
            role: self.role,
            is_blocked: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AccountCreatedResponse {
    pub id: Uuid,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(Role::from_str("MODERATOR"), Ok(Role::Moderator));
        assert_eq!(Role::from_str("moderator"), Ok(Role::Moderator));
        assert_eq!(Role::from_str("User"), Ok(Role::User));
        assert!(Role::from_str("admin").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn register_request_rejects_bad_email() {
        let request = RegisterAccountRequest {
            email: "not-an-email".to_string(),
            password: "Sufficient1".to_string(),
            role: Role::User,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let request = RegisterAccountRequest {
            email: "user@example.com".to_string(),
            password: "Ab1".to_string(),
            role: Role::User,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_defaults_to_user_role() {
        let request: RegisterAccountRequest =
            serde_json::from_str(r#"{"email": "user@example.com", "password": "Sufficient1"}"#)
                .unwrap();
        assert_eq!(request.role, Role::User);
    }

    #[test]
    fn insert_carries_hash_not_password() {
        let request = RegisterAccountRequest {
            email: "user@example.com".to_string(),
            password: "Sufficient1".to_string(),
            role: Role::Moderator,
        };
        let insert = request.prepare_for_insert("$argon2id$stub".to_string());

        assert_eq!(insert.email, "user@example.com");
        assert_eq!(insert.password_hash, "$argon2id$stub");
        assert_eq!(insert.role, Role::Moderator);
        assert!(!insert.is_blocked);
    }
}
