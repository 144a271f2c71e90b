//! Session identity: password hashing, login tokens and the request extractor.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, web};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::User;
use crate::models::config::ServerConfig;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserReader};
use crate::SERVICE_ADMIN_ROLE;

/// Claims of a signed-in dashboard user, stored as a JWT in the identity cookie.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User id as a string.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: i64,
}

impl AuthenticatedUser {
    /// Builds claims for `user` valid for `ttl_hours`.
    pub fn new(user: &User, ttl_hours: i64) -> Self {
        Self {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            name: user.name.to_string(),
            roles: user.role.granted_roles(),
            exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        let id = self
            .sub
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::NonPositiveId)?;
        UserId::new(id)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|granted| granted == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(SERVICE_ADMIN_ROLE)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, actix_web::Error> {
        let token = req
            .get_identity()
            .and_then(|identity| identity.id())
            .map_err(|_| ErrorUnauthorized("Unauthorized"))?;
        let config = req
            .app_data::<web::Data<ServerConfig>>()
            .ok_or_else(|| ErrorInternalServerError("Server config is not registered"))?;

        let claims = Self::from_jwt(&token, &config.secret).map_err(|err| {
            log::debug!("Rejected session token: {err}");
            ErrorUnauthorized("Unauthorized")
        })?;

        let repo = req
            .app_data::<web::Data<DieselRepository>>()
            .ok_or_else(|| ErrorInternalServerError("Repository is not registered"))?;
        match claims.is_active_account(repo.get_ref()) {
            Ok(true) => Ok(claims),
            Ok(false) => {
                log::info!("Rejected session of inactive account {}", claims.email);
                Err(ErrorUnauthorized("Unauthorized"))
            }
            Err(err) => {
                log::error!("Failed to load session account: {err}");
                Err(ErrorInternalServerError("Internal error"))
            }
        }
    }

    /// The account behind the token still exists and is active.
    pub fn is_active_account<R>(&self, repo: &R) -> RepositoryResult<bool>
    where
        R: UserReader + ?Sized,
    {
        let Ok(id) = self.user_id() else {
            return Ok(false);
        };
        Ok(repo.get_user_by_id(id)?.is_some_and(|user| user.is_active))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

/// Hashes a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::types::{EmailAddress, UserName};
    use crate::domain::user::UserRole;
    use crate::repository::mock::MockRepository;

    fn user(id: i32, is_active: bool) -> User {
        User {
            id: UserId::new(id).unwrap(),
            email: EmailAddress::new(format!("agent{id}@example.com")).unwrap(),
            name: UserName::new("Agent").unwrap(),
            role: UserRole::Agent,
            password_hash: String::new(),
            is_active,
            created_at: Utc::now().naive_utc(),
        }
    }

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256-signing-in-unit-tests!";

    fn claims(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "7".to_string(),
            email: "agent@example.com".to_string(),
            name: "Agent".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        }
    }

    #[test]
    fn token_round_trips_with_the_same_secret() {
        let user = claims(&[SERVICE_ACCESS_ROLE]);
        let token = user.to_jwt(SECRET).unwrap();
        assert_eq!(AuthenticatedUser::from_jwt(&token, SECRET).unwrap(), user);
        assert!(AuthenticatedUser::from_jwt(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut user = claims(&[SERVICE_ACCESS_ROLE]);
        user.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = user.to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn roles_and_id() {
        let admin = claims(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE]);
        assert!(admin.is_admin());
        assert!(!claims(&[SERVICE_ACCESS_ROLE]).is_admin());
        assert_eq!(admin.user_id().unwrap().get(), 7);
    }

    #[test]
    fn inactive_or_missing_account_is_not_active() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|id| {
            Ok(match id.get() {
                7 => Some(user(7, true)),
                8 => Some(user(8, false)),
                _ => None,
            })
        });

        let mut session = claims(&[SERVICE_ACCESS_ROLE]);
        assert!(session.is_active_account(&repo).unwrap());
        session.sub = "8".to_string();
        assert!(!session.is_active_account(&repo).unwrap());
        session.sub = "9".to_string();
        assert!(!session.is_active_account(&repo).unwrap());
        session.sub = "nije-broj".to_string();
        assert!(!session.is_active_account(&repo).unwrap());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("tajna-lozinka").unwrap();
        assert!(verify_password("tajna-lozinka", &hash));
        assert!(!verify_password("kriva-lozinka", &hash));
        assert!(!verify_password("tajna-lozinka", "not-a-hash"));
    }
}
