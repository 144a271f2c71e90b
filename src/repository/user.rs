//! Repository implementation for dashboard users.

use diesel::prelude::*;

use crate::{
    domain::{
        types::{EmailAddress, UserId},
        user::{NewUser, User},
    },
    models::user::{NewUser as DbNewUser, User as DbUser},
    repository::{
        DieselRepository, UserReader, UserWriter,
        errors::{RepositoryError, RepositoryResult},
        into_domain,
    },
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::korisnici;

        let mut conn = self.conn()?;
        let db_user = korisnici::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>> {
        use crate::schema::korisnici;

        let mut conn = self.conn()?;
        let db_user = korisnici::table
            .filter(korisnici::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        use crate::schema::korisnici;

        let mut conn = self.conn()?;
        let users = korisnici::table
            .order(korisnici::name.asc())
            .load::<DbUser>(&mut conn)?;

        into_domain(users)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::korisnici;

        let mut conn = self.conn()?;
        let insertable: DbNewUser = new_user.into();
        let db_user = diesel::insert_into(korisnici::table)
            .values(&insertable)
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(db_user)?)
    }

    fn set_user_active(&self, id: UserId, is_active: bool) -> RepositoryResult<User> {
        use crate::schema::korisnici;

        let mut conn = self.conn()?;
        let db_user = diesel::update(korisnici::table.find(id.get()))
            .set(korisnici::is_active.eq(is_active))
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(db_user)?)
    }
}
