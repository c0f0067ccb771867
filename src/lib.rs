//! Donation and volunteering platform: accounts, foundations, donations,
//! social actions and the participation, feedback and notification flows
//! around them, served as a JSON API.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db_migration;
pub mod domains;
pub mod errors;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use app::AppServices;
pub use config::AppConfig;
