pub mod dispatcher;
pub mod repository;
pub mod service;
pub mod types;

pub use dispatcher::{NotificationDispatcher, NotificationSink};
pub use repository::NotificationRepository;
pub use service::NotificationService;
pub use types::Notification;
