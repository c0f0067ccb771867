pub mod repository;
pub mod service;
pub mod types;

pub use repository::RatingRepository;
pub use service::RatingService;
pub use types::Rating;
