pub mod repository;

pub use repository::{Page, Repository};
