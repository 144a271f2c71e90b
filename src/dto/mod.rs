//! Page data handed from services to templates and JSON responses.

pub mod analytics;
pub mod api;
pub mod calls;
pub mod campaigns;
pub mod customers;
pub mod listings;
pub mod main;
pub mod public;
pub mod users;
