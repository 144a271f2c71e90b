//! Pages reachable without a dashboard session.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::web_log::UtmParams;
use crate::forms::public::{InquiryForm, PublicPageQuery};
use crate::repository::DieselRepository;
use crate::routes::{alerts_context, not_found, redirect, render_template};
use crate::services::public::{self as public_service, Visit};
use crate::services::ServiceError;

/// Cookie holding the anonymous visitor id.
pub const VISITOR_COOKIE: &str = "vid";

fn header_value(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Collects what gets logged about a request.
pub fn visit_from_request(req: &HttpRequest, utm: UtmParams) -> Visit {
    Visit {
        visitor_id: req.cookie(VISITOR_COOKIE).map(|c| c.value().to_string()),
        path: Some(req.uri().to_string()),
        referrer: header_value(req, header::REFERER),
        user_agent: header_value(req, header::USER_AGENT),
        utm,
    }
}

fn visitor_cookie(visitor_id: String) -> Cookie<'static> {
    Cookie::build(VISITOR_COOKIE, visitor_id)
        .path("/")
        .max_age(Duration::days(365))
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

#[get("/ponuda/{slug}")]
pub async fn show_public_listing(
    req: HttpRequest,
    slug: web::Path<String>,
    params: web::Query<PublicPageQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let after_inquiry = params.is_after_inquiry();
    let visit = visit_from_request(&req, params.into());
    let returning_visitor = visit.visitor_id.is_some();
    let visitor_id = visit.visitor_id();

    let page = if after_inquiry {
        public_service::listing_page(repo.get_ref(), &slug, &visit)
    } else {
        public_service::view_listing(repo.get_ref(), &slug, &visitor_id, &visit)
    };

    match page {
        Ok(data) => {
            let mut context = alerts_context(&flash_messages);
            context.insert("listing", &data.listing);
            context.insert("price_per_m2", &data.price_per_m2);
            context.insert("utm", &data.utm);

            let mut response = render_template(&tera, "public/listing.html", &context);
            if !returning_visitor {
                if let Err(err) = response.add_cookie(&visitor_cookie(visitor_id)) {
                    log::warn!("Failed to set visitor cookie: {err}");
                }
            }
            response
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(err) => {
            log::error!("Failed to show public listing {slug}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/ponuda/{slug}/upit")]
pub async fn submit_inquiry(
    req: HttpRequest,
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<InquiryForm>,
) -> impl Responder {
    let visit = visit_from_request(&req, UtmParams::default());
    let visitor_id = visit.visitor_id();
    let back = PublicPageQuery::after_inquiry(&form).page_path(&slug);

    match public_service::submit_inquiry(repo.get_ref(), &slug, form, &visitor_id, &visit) {
        Ok(_) => {
            FlashMessage::success("Hvala na upitu! Javit ćemo vam se uskoro.").send();
            redirect(&back)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(ServiceError::NotFound) => not_found(&tera),
        Err(err) => {
            log::error!("Failed to store inquiry for {slug}: {err}");
            FlashMessage::error("Upit trenutno nije moguće poslati.").send();
            redirect(&back)
        }
    }
}
