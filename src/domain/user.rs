//! Dashboard users (`korisnici`).

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::types::{EmailAddress, UserId, UserName, string_enum};

string_enum! {
    /// Access level of a dashboard user.
    UserRole {
        Admin => "admin",
        Agent => "agent",
    }
}

impl UserRole {
    /// Role names granted to the session token. Admins are agents too.
    pub fn granted_roles(self) -> Vec<String> {
        match self {
            UserRole::Admin => vec!["agent".to_string(), "admin".to_string()],
            UserRole::Agent => vec!["agent".to_string()],
        }
    }
}

/// A dashboard account. The password hash never leaves the repository layer
/// serialized; templates only receive the public fields.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: UserName,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: EmailAddress,
    pub name: UserName,
    pub role: UserRole,
    pub password_hash: String,
}

impl NewUser {
    #[must_use]
    pub fn new(email: EmailAddress, name: UserName, role: UserRole, password_hash: String) -> Self {
        Self {
            email,
            name,
            role,
            password_hash,
        }
    }
}
