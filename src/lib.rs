#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::analytics::{campaigns as campaign_report, summary, web_log};
#[cfg(feature = "server")]
use crate::routes::api::{api_v1_listings, api_v1_summary, api_v1_track, json_config};
#[cfg(feature = "server")]
use crate::routes::auth::{login, login_page, logout};
#[cfg(feature = "server")]
use crate::routes::calls::{add_call, calls, update_call_status};
#[cfg(feature = "server")]
use crate::routes::campaigns::{
    add_campaign, assign_customers, campaigns, delete_campaign, edit_campaign, show_campaign,
    toggle_campaign, update_contact,
};
#[cfg(feature = "server")]
use crate::routes::customers::{customers, delete_customer, upload_customers};
#[cfg(feature = "server")]
use crate::routes::listings::{
    add_listing, archive_listing, delete_listing, edit_listing, listings, publish_listing,
    show_listing,
};
#[cfg(feature = "server")]
use crate::routes::main::show_index;
#[cfg(feature = "server")]
use crate::routes::public::{show_public_listing, submit_inquiry};
#[cfg(feature = "server")]
use crate::routes::users::{add_user, toggle_user, users};

#[cfg(feature = "data")]
pub mod analytics;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Role every dashboard user holds.
pub const SERVICE_ACCESS_ROLE: &str = "agent";
/// Role allowed to manage users and delete records.
pub const SERVICE_ADMIN_ROLE: &str = "admin";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting dashboard on {}:{} for {}",
        bind_address.0,
        bind_address.1,
        server_config.domain
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(login_page)
            .service(login)
            .service(show_public_listing)
            .service(submit_inquiry)
            .service(
                web::scope("/api")
                    .app_data(json_config())
                    .service(api_v1_listings)
                    .service(api_v1_summary)
                    .service(api_v1_track),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(listings)
                    .service(add_listing)
                    .service(show_listing)
                    .service(edit_listing)
                    .service(archive_listing)
                    .service(publish_listing)
                    .service(delete_listing)
                    .service(campaigns)
                    .service(add_campaign)
                    .service(show_campaign)
                    .service(edit_campaign)
                    .service(toggle_campaign)
                    .service(delete_campaign)
                    .service(assign_customers)
                    .service(update_contact)
                    .service(customers)
                    .service(upload_customers)
                    .service(delete_customer)
                    .service(calls)
                    .service(add_call)
                    .service(update_call_status)
                    .service(summary)
                    .service(web_log)
                    .service(campaign_report)
                    .service(users)
                    .service(add_user)
                    .service(toggle_user)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
