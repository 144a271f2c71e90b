use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::calls::{AddCallForm, CallStatusForm, CallsQuery};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, calls as calls_service};

#[get("/calls")]
pub async fn calls(
    params: web::Query<CallsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match calls_service::list_calls(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "calls");
            context.insert("calls", &data.calls);
            context.insert("listings", &data.listings);
            context.insert("status_filter", &data.status_filter);
            context.insert("listing_filter", &data.listing_filter);
            context.insert("statuses", &data.statuses);
            context.insert("sources", &data.sources);

            render_template(&tera, "calls/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to list calls: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/calls/add")]
pub async fn add_call(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCallForm>,
) -> impl Responder {
    match calls_service::add_call(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Poziv zabilježen.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to add call: {err}");
            FlashMessage::error("Greška pri spremanju poziva.").send();
        }
    }
    redirect("/calls")
}

#[post("/calls/{call_id}/status")]
pub async fn update_call_status(
    call_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CallStatusForm>,
) -> impl Responder {
    match calls_service::update_call_status(repo.get_ref(), &user, call_id.into_inner(), form) {
        Ok(_) => {
            FlashMessage::success("Status poziva promijenjen.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Poziv nije pronađen.").send();
        }
        Err(err) => {
            log::error!("Failed to update call status: {err}");
            FlashMessage::error("Greška pri promjeni statusa.").send();
        }
    }
    redirect("/calls")
}
