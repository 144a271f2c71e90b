use serde::Serialize;

use crate::domain::user::{User, UserRole};

#[derive(Debug, Serialize)]
pub struct UsersPageData {
    pub users: Vec<User>,
    pub roles: &'static [UserRole],
}
