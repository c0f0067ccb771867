pub mod repository;
pub mod service;
pub mod types;

pub use repository::SuggestionRepository;
pub use service::SuggestionService;
pub use types::Suggestion;
