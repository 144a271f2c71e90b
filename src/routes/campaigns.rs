use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::campaigns::{AssignCustomersForm, CampaignForm, CampaignsQuery, ContactStatusForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, not_found, redirect, render_template};
use crate::services::{ServiceError, campaigns as campaigns_service};

#[get("/campaigns")]
pub async fn campaigns(
    params: web::Query<CampaignsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match campaigns_service::list_campaigns(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "campaigns");
            context.insert("campaigns", &data.campaigns);
            context.insert("listings", &data.listings);
            context.insert("selected_listing", &data.selected_listing);
            context.insert("channels", &data.channels);

            render_template(&tera, "campaigns/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to list campaigns: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/campaigns/{campaign_id}")]
pub async fn show_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match campaigns_service::show_campaign(
        repo.get_ref(),
        &user,
        campaign_id.into_inner(),
        &server_config.domain,
    ) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "campaigns");
            context.insert("campaign", &data.campaign);
            context.insert("listing", &data.listing);
            context.insert("tracking_url", &data.tracking_url);
            context.insert("funnel", &data.funnel);
            context.insert("contacts", &data.contacts);
            context.insert("available_customers", &data.available_customers);
            context.insert("listings", &data.listings);
            context.insert("channels", &data.channels);
            context.insert("statuses", &data.statuses);

            render_template(&tera, "campaigns/show.html", &context)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to show campaign: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/campaigns/add")]
pub async fn add_campaign(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CampaignForm>,
) -> impl Responder {
    match campaigns_service::create_campaign(repo.get_ref(), &user, form) {
        Ok(campaign) => {
            FlashMessage::success("Kampanja dodana.").send();
            redirect(&format!("/campaigns/{}", campaign.id))
        }
        Err(err) => flash_failure(err, "/campaigns", "create campaign"),
    }
}

#[post("/campaigns/{campaign_id}/edit")]
pub async fn edit_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CampaignForm>,
) -> impl Responder {
    let campaign_id = campaign_id.into_inner();
    let back = format!("/campaigns/{campaign_id}");

    match campaigns_service::update_campaign(repo.get_ref(), &user, campaign_id, form) {
        Ok(_) => {
            FlashMessage::success("Kampanja spremljena.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "update campaign"),
    }
}

#[post("/campaigns/{campaign_id}/toggle")]
pub async fn toggle_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let campaign_id = campaign_id.into_inner();
    let back = format!("/campaigns/{campaign_id}");

    match campaigns_service::toggle_campaign_active(repo.get_ref(), &user, campaign_id) {
        Ok(campaign) => {
            let message = if campaign.is_active {
                "Kampanja aktivirana."
            } else {
                "Kampanja zaustavljena."
            };
            FlashMessage::success(message).send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "toggle campaign"),
    }
}

#[post("/campaigns/{campaign_id}/delete")]
pub async fn delete_campaign(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let campaign_id = campaign_id.into_inner();

    match campaigns_service::delete_campaign(repo.get_ref(), &user, campaign_id) {
        Ok(()) => {
            FlashMessage::success("Kampanja obrisana.").send();
            redirect("/campaigns")
        }
        Err(err) => flash_failure(err, &format!("/campaigns/{campaign_id}"), "delete campaign"),
    }
}

#[post("/campaigns/{campaign_id}/assign")]
pub async fn assign_customers(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Bytes,
) -> impl Responder {
    let campaign_id = campaign_id.into_inner();
    let back = format!("/campaigns/{campaign_id}");

    let form: AssignCustomersForm = match serde_html_form::from_bytes(&form) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed assignment form: {err}");
            FlashMessage::error("Neispravan odabir kupaca.").send();
            return redirect(&back);
        }
    };

    match campaigns_service::assign_customers(repo.get_ref(), &user, campaign_id, form) {
        Ok(added) => {
            FlashMessage::success(format!("Dodano kupaca: {added}.")).send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "assign customers"),
    }
}

#[post("/campaigns/{campaign_id}/contact")]
pub async fn update_contact(
    campaign_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ContactStatusForm>,
) -> impl Responder {
    let campaign_id = campaign_id.into_inner();
    let back = format!("/campaigns/{campaign_id}");

    match campaigns_service::update_contact_status(repo.get_ref(), &user, campaign_id, form) {
        Ok(_) => {
            FlashMessage::success("Status kupca spremljen.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "update contact status"),
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
            FlashMessage::error("Kampanja nije pronađena.").send();
            redirect("/campaigns")
        }
        err => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error("Greška pri spremanju kampanje.").send();
            redirect(back)
        }
    }
}
