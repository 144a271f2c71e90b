//! Database models shared across the dashboard repository.

#[cfg(feature = "server")]
pub mod auth;
pub mod call;
pub mod campaign;
pub mod config;
pub mod customer;
pub mod listing;
pub mod user;
pub mod web_log;
