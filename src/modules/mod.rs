pub mod health;
pub mod processes;
pub mod return_analysis;
