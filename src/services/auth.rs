//! Login and account creation.

use validator::Validate;

use crate::domain::types::EmailAddress;
use crate::domain::user::{NewUser, User};
use crate::forms::auth::LoginForm;
use crate::forms::users::AddUserPayload;
use crate::models::auth::{AuthenticatedUser, hash_password, verify_password};
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

pub const INVALID_CREDENTIALS: &str = "Pogrešan email ili lozinka.";

/// Checks credentials and returns the claims to store in the session.
///
/// Unknown emails, wrong passwords and deactivated accounts all fail with the
/// same message.
pub fn login<R>(repo: &R, form: LoginForm, session_ttl_hours: i64) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    let invalid = || ServiceError::Form(INVALID_CREDENTIALS.to_string());

    form.validate().map_err(|_| invalid())?;
    let email = EmailAddress::new(form.email).map_err(|_| invalid())?;

    let user = repo.get_user_by_email(&email)?.ok_or_else(invalid)?;
    if !user.is_active || !verify_password(&form.password, &user.password_hash) {
        log::info!("Rejected login for {email}");
        return Err(invalid());
    }

    Ok(AuthenticatedUser::new(&user, session_ttl_hours))
}

/// Hashes the password and stores a new account with a unique email.
pub fn create_account<R>(repo: &R, payload: AddUserPayload) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    if repo.get_user_by_email(&payload.email)?.is_some() {
        return Err(ServiceError::Form(
            "Korisnik s tom email adresom već postoji.".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;
    let new_user = NewUser::new(payload.email, payload.name, payload.role, password_hash);

    Ok(repo.create_user(&new_user)?)
}
