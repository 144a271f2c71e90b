//! Domain aggregates exposed by the dashboard service layer.

pub mod call;
pub mod campaign;
pub mod customer;
pub mod listing;
pub mod types;
pub mod user;
pub mod web_log;
