pub mod repository;
pub mod service;
pub mod types;

pub use repository::ParticipationRepository;
pub use service::ParticipationService;
pub use types::ParticipationRequest;
