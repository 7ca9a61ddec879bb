mod return_analysis_controller;

pub use return_analysis_controller::{analyze_returns, configure, list_customers};
