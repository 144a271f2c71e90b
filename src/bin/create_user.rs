//! Creates a dashboard account from the command line.
//!
//! Usage: `create_user <email> <name> <password> [admin|agent]`

use std::env;

use config::Config;
use dotenvy::dotenv;
use nekretnine_crm::db::establish_connection_pool;
use nekretnine_crm::forms::users::{AddUserForm, AddUserPayload};
use nekretnine_crm::models::config::ServerConfig;
use nekretnine_crm::repository::DieselRepository;
use nekretnine_crm::services::auth::create_account;

const USAGE: &str = "usage: create_user <email> <name> <password> [admin|agent]";

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }

    let form = AddUserForm {
        email: args[0].clone(),
        name: args[1].clone(),
        password: args[2].clone(),
        role: args.get(3).cloned().unwrap_or_else(|| "agent".to_string()),
    };
    let payload = match AddUserPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => {
            log::error!("Invalid account details: {err}");
            std::process::exit(2);
        }
    };

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());
    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()
        .and_then(|settings| settings.try_deserialize::<ServerConfig>());
    let server_config = match settings {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Failed to establish database connection: {err}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match create_account(&repo, payload) {
        Ok(user) => log::info!("Created {} account {}", user.role, user.email),
        Err(err) => {
            log::error!("Failed to create account: {err}");
            std::process::exit(1);
        }
    }
}
