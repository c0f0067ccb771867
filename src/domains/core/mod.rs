pub mod parse;
pub mod repository;

pub use repository::{FindById, HardDeletable};
