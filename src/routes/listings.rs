use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::listings::{ListingForm, ListingsQuery};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, not_found, redirect, render_template};
use crate::services::{ServiceError, listings as listings_service};

#[get("/listings")]
pub async fn listings(
    params: web::Query<ListingsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match listings_service::list_listings(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "listings");
            context.insert("listings", &data.listings);
            context.insert("archived", &data.archived);
            context.insert("property_types", &data.property_types);
            context.insert("transaction_types", &data.transaction_types);
            if let Some(query) = &data.search_query {
                context.insert("search_query", query);
            }

            render_template(&tera, "listings/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to list listings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/listings/{listing_id}")]
pub async fn show_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match listings_service::show_listing(
        repo.get_ref(),
        &user,
        listing_id.into_inner(),
        &server_config.domain,
    ) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "listings");
            context.insert("listing", &data.listing);
            context.insert("price_per_m2", &data.price_per_m2);
            context.insert("public_url", &data.public_url);
            context.insert("campaigns", &data.campaigns);
            context.insert("recent_calls", &data.recent_calls);
            context.insert("summary", &data.summary);
            context.insert("property_types", &data.property_types);
            context.insert("transaction_types", &data.transaction_types);

            render_template(&tera, "listings/show.html", &context)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to show listing: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/listings/add")]
pub async fn add_listing(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ListingForm>,
) -> impl Responder {
    match listings_service::create_listing(repo.get_ref(), &user, form) {
        Ok(listing) => {
            FlashMessage::success("Ponuda dodana.").send();
            redirect(&format!("/listings/{}", listing.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Nemate ovlasti.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/listings")
        }
        Err(err) => {
            log::error!("Failed to create listing: {err}");
            FlashMessage::error("Greška pri spremanju ponude.").send();
            redirect("/listings")
        }
    }
}

#[post("/listings/{listing_id}/edit")]
pub async fn edit_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ListingForm>,
) -> impl Responder {
    let listing_id = listing_id.into_inner();
    let back = format!("/listings/{listing_id}");

    match listings_service::update_listing(repo.get_ref(), &user, listing_id, form) {
        Ok(_) => {
            FlashMessage::success("Ponuda spremljena.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "update listing"),
    }
}

#[post("/listings/{listing_id}/archive")]
pub async fn archive_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let listing_id = listing_id.into_inner();
    let back = format!("/listings/{listing_id}");

    match listings_service::toggle_archive(repo.get_ref(), &user, listing_id) {
        Ok(listing) => {
            let message = if listing.is_archived {
                "Ponuda arhivirana."
            } else {
                "Ponuda vraćena iz arhive."
            };
            FlashMessage::success(message).send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "toggle archive"),
    }
}

#[post("/listings/{listing_id}/publish")]
pub async fn publish_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let listing_id = listing_id.into_inner();
    let back = format!("/listings/{listing_id}");

    match listings_service::toggle_publish(repo.get_ref(), &user, listing_id) {
        Ok(listing) => {
            let message = if listing.is_published {
                "Ponuda objavljena."
            } else {
                "Ponuda skrivena."
            };
            FlashMessage::success(message).send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "toggle publish"),
    }
}

#[post("/listings/{listing_id}/delete")]
pub async fn delete_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let listing_id = listing_id.into_inner();

    match listings_service::delete_listing(repo.get_ref(), &user, listing_id) {
        Ok(()) => {
            FlashMessage::success("Ponuda obrisana.").send();
            redirect("/listings")
        }
        Err(err) => flash_failure(err, &format!("/listings/{listing_id}"), "delete listing"),
    }
}

fn flash_failure(err: ServiceError, back: &str, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Nemate ovlasti.").send();
            redirect(back)
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::NotFound => {
            FlashMessage::error("Ponuda nije pronađena.").send();
            redirect("/listings")
        }
        err => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error("Greška pri spremanju ponude.").send();
            redirect(back)
        }
    }
}
