pub mod repository;
pub mod service;
pub mod types;

pub use repository::CommentRepository;
pub use service::CommentService;
pub use types::Comment;
