pub mod repository;
pub mod service;
pub mod types;

pub use repository::FavoriteRepository;
pub use service::FavoriteService;
pub use types::Favorite;
