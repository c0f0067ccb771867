pub mod repository;
pub mod service;
pub mod types;

pub use repository::FoundationRepository;
pub use service::FoundationService;
pub use types::Foundation;
