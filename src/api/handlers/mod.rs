pub mod auth;
pub mod certificates;
pub mod comments;
pub mod donations;
pub mod foundations;
pub mod health;
pub mod notifications;
pub mod participation;
pub mod ratings;
pub mod social_actions;
pub mod suggestions;
pub mod users;
