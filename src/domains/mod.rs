pub mod certificate;
pub mod comment;
pub mod core;
pub mod donation;
pub mod favorite;
pub mod foundation;
pub mod notification;
pub mod participation;
pub mod permission;
pub mod rating;
pub mod social_action;
pub mod suggestion;
pub mod user;

pub use user::{User, UserService};
