pub mod context;
pub mod service;
pub mod jwt;

// Re-export public items
pub use context::AuthContext;
pub use jwt::JwtKeys;
pub use service::{AuthService, LoginResult};
