//! Return-rate analysis over completed production plans

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::{ReturnAnalysisReport, ReturnAnalysisRequest};
pub use repositories::{PgReturnAnalysisRepository, ReturnAnalysisRepository};
pub use services::ReturnAnalysisService;
