use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::customers::{CustomersQuery, UploadCustomersForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, customers as customers_service};

#[get("/customers")]
pub async fn customers(
    params: web::Query<CustomersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match customers_service::list_customers(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "customers");
            context.insert("customers", &data.customers);
            if let Some(query) = &data.search_query {
                context.insert("search_query", query);
            }

            render_template(&tera, "customers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to list customers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/customers/upload")]
pub async fn upload_customers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadCustomersForm>,
) -> impl Responder {
    match customers_service::upload_customers(repo.get_ref(), &user, form) {
        Ok(report) => {
            FlashMessage::success(format!(
                "Uvezeno kupaca: {}, preskočeno: {} ({}).",
                report.imported, report.skipped, report.import_batch
            ))
            .send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to import customers: {err}");
            FlashMessage::error("Greška pri uvozu kupaca.").send();
        }
    }
    redirect("/customers")
}

#[post("/customers/{customer_id}/delete")]
pub async fn delete_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customers_service::delete_customer(repo.get_ref(), &user, customer_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Kupac obrisan.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Kupac nije pronađen.").send();
        }
        Err(err) => {
            log::error!("Failed to delete customer: {err}");
            FlashMessage::error("Greška pri brisanju kupca.").send();
        }
    }
    redirect("/customers")
}
