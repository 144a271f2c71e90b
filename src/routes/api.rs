use actix_web::error::InternalError;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};

use crate::domain::web_log::UtmParams;
use crate::dto::api::ApiError;
use crate::forms::analytics::ReportQuery;
use crate::forms::listings::ListingsQuery;
use crate::forms::public::TrackEventRequest;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::public::visit_from_request;
use crate::services::public::{self as public_service, Visit};
use crate::services::{ServiceError, api as api_service};

/// Turns malformed JSON bodies into `{error}` responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(ApiError::new(err.to_string()));
            InternalError::from_response(err, response).into()
        })
}

fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json(ApiError::new("unauthorized")),
        ServiceError::NotFound => HttpResponse::NotFound().json(ApiError::new("not found")),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(ApiError::new(message)),
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().json(ApiError::new("internal error"))
        }
    }
}

#[get("/v1/listings")]
pub async fn api_v1_listings(
    params: web::Query<ListingsQuery>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Some(user) = user else {
        return error_response(ServiceError::Unauthorized, "list listings");
    };

    match api_service::list_listings(repo.get_ref(), &user, params.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err, "list listings"),
    }
}

#[get("/v1/analytics/summary")]
pub async fn api_v1_summary(
    params: web::Query<ReportQuery>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Some(user) = user else {
        return error_response(ServiceError::Unauthorized, "build summary");
    };

    match api_service::summary(repo.get_ref(), &user, &params) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err, "build summary"),
    }
}

#[post("/v1/track")]
pub async fn api_v1_track(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Json(request): web::Json<TrackEventRequest>,
) -> impl Responder {
    // The page reports its own path; this request's path is the API endpoint.
    let visit = Visit {
        path: None,
        ..visit_from_request(&req, UtmParams::default())
    };

    match public_service::track_event(repo.get_ref(), request, &visit) {
        Ok(event) => HttpResponse::Created().json(event),
        Err(err) => error_response(err, "track event"),
    }
}
