pub mod repository;
pub mod service;
pub mod types;

pub use repository::CertificateRepository;
pub use service::CertificateService;
pub use types::Certificate;
