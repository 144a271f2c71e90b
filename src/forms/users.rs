use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{EmailAddress, UserName};
use crate::domain::user::UserRole;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Admin form creating a dashboard account.
pub struct AddUserForm {
    #[validate(length(min = 3, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: String,
}

/// Validated [`AddUserForm`]; the password is still plain text.
pub struct AddUserPayload {
    pub email: EmailAddress,
    pub name: UserName,
    pub role: UserRole,
    pub password: String,
}

impl TryFrom<AddUserForm> for AddUserPayload {
    type Error = FormError;

    fn try_from(form: AddUserForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            email: EmailAddress::new(form.email).map_err(FormError::for_field("email"))?,
            name: UserName::new(form.name).map_err(FormError::for_field("ime"))?,
            role: form.role.parse().map_err(FormError::for_field("uloga"))?,
            password: form.password,
        })
    }
}
