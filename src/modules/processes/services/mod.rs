pub mod process_service;

pub use process_service::ProcessService;
