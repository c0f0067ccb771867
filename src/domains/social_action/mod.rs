pub mod repository;
pub mod service;
pub mod types;

pub use repository::SocialActionRepository;
pub use service::SocialActionService;
pub use types::SocialAction;
