use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::analytics::ReportQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, analytics as analytics_service};

#[get("/analytics")]
pub async fn summary(
    params: web::Query<ReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match analytics_service::summary(repo.get_ref(), &user, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "analytics");
            context.insert("period", &data.period);
            context.insert("summary", &data.summary);
            context.insert("listings", &data.listings);
            context.insert("selected_listing", &data.selected_listing);

            render_template(&tera, "analytics/index.html", &context)
        }
        Err(err) => report_failure(err, "/analytics"),
    }
}

#[get("/analytics/weblog")]
pub async fn web_log(
    params: web::Query<ReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match analytics_service::web_log(repo.get_ref(), &user, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "weblog");
            context.insert("period", &data.period);
            context.insert("report", &data.report);
            context.insert("events", &data.events);
            context.insert("listings", &data.listings);
            context.insert("selected_listing", &data.selected_listing);
            context.insert("selected_event_type", &data.selected_event_type);

            render_template(&tera, "analytics/weblog.html", &context)
        }
        Err(err) => report_failure(err, "/analytics/weblog"),
    }
}

#[get("/analytics/campaigns")]
pub async fn campaigns(
    params: web::Query<ReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match analytics_service::campaigns(repo.get_ref(), &user, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "campaign_analytics");
            context.insert("period", &data.period);
            context.insert("analytics", &data.analytics);

            render_template(&tera, "analytics/campaigns.html", &context)
        }
        Err(err) => report_failure(err, "/analytics/campaigns"),
    }
}

/// An invalid period falls back to the default window of the same report.
fn report_failure(err: ServiceError, report_path: &str) -> HttpResponse {
    match err {
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(report_path)
        }
        ServiceError::Unauthorized => HttpResponse::Forbidden().finish(),
        err => {
            log::error!("Failed to build report {report_path}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
