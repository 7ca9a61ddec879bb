//! FabricOps manufacturing operations backend
//!
//! Return analysis over completed production plans plus process-step
//! maintenance, served over HTTP.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod telemetry;

// Re-export commonly used types
pub use modules::processes;
pub use modules::return_analysis;
