pub mod process_repository;

pub use process_repository::PgProcessRepository;
