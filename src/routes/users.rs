use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::users::AddUserForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, users as users_service};

#[get("/users")]
pub async fn users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users_service::list_users(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "users");
            context.insert("users", &data.users);
            context.insert("roles", &data.roles);

            render_template(&tera, "users/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to list users: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/users/add")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddUserForm>,
) -> impl Responder {
    match users_service::add_user(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Korisnik dodan.").send();
            redirect("/users")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to add user: {err}");
            FlashMessage::error("Greška pri dodavanju korisnika.").send();
            redirect("/users")
        }
    }
}

#[post("/users/{user_id}/toggle")]
pub async fn toggle_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match users_service::toggle_user_active(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(updated) => {
            let message = if updated.is_active {
                "Korisnik aktiviran."
            } else {
                "Korisnik deaktiviran."
            };
            FlashMessage::success(message).send();
            redirect("/users")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/users")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Korisnik nije pronađen.").send();
            redirect("/users")
        }
        Err(err) => {
            log::error!("Failed to toggle user: {err}");
            FlashMessage::error("Greška pri promjeni korisnika.").send();
            redirect("/users")
        }
    }
}
