pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::Process;
pub use repositories::PgProcessRepository;
pub use services::ProcessService;
