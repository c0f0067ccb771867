pub mod repository;
pub mod service;
pub mod types;

pub use repository::DonationRepository;
pub use service::DonationService;
pub use types::Donation;
