use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
/// Credentials posted by the login page.
pub struct LoginForm {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
