//! Dashboard account administration.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::types::UserId;
use crate::domain::user::{User, UserRole};
use crate::dto::users::UsersPageData;
use crate::forms::users::{AddUserForm, AddUserPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, auth, ensure_role};

pub fn list_users<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<UsersPageData>
where
    R: UserReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    Ok(UsersPageData {
        users: repo.list_users()?,
        roles: UserRole::ALL,
    })
}

pub fn add_user<R>(repo: &R, user: &AuthenticatedUser, form: AddUserForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = AddUserPayload::try_from(form)?;
    let created = auth::create_account(repo, payload)?;
    log::info!("User {} created by {}", created.email, user.email);

    Ok(created)
}

/// Activates or deactivates an account. Admins cannot lock themselves out.
pub fn toggle_user_active<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let target_id = UserId::new(user_id)?;
    if user.user_id()? == target_id {
        return Err(ServiceError::Form(
            "Ne možete deaktivirati vlastiti račun.".to_string(),
        ));
    }

    let target = repo
        .get_user_by_id(target_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(repo.set_user_active(target_id, !target.is_active)?)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{EmailAddress, UserName};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, agent_user};

    fn stored(id: i32, is_active: bool) -> User {
        User {
            id: UserId::new(id).unwrap(),
            email: EmailAddress::new(format!("user{id}@example.com")).unwrap(),
            name: UserName::new("Korisnik").unwrap(),
            role: UserRole::Agent,
            password_hash: String::new(),
            is_active,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn listing_users_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_list_users().times(0);

        assert!(matches!(
            list_users(&repo, &agent_user()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn admin_cannot_deactivate_self() {
        let mut repo = MockRepository::new();
        repo.expect_set_user_active().times(0);

        let result = toggle_user_active(&repo, &admin_user(), 1);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn toggle_flips_the_active_flag() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(stored(id.get(), true))));
        repo.expect_set_user_active()
            .withf(|id, active| id.get() == 5 && !*active)
            .times(1)
            .returning(|id, active| Ok(stored(id.get(), active)));

        let user = toggle_user_active(&repo, &admin_user(), 5).unwrap();

        assert!(!user.is_active);
    }

    #[test]
    fn toggle_unknown_user_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(None));

        assert!(matches!(
            toggle_user_active(&repo, &admin_user(), 42),
            Err(ServiceError::NotFound)
        ));
    }
}
