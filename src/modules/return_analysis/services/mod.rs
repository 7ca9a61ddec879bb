pub mod report_assembler;
pub mod return_analysis_service;

pub use report_assembler::{assemble_report, return_rate};
pub use return_analysis_service::{with_cancellation, ReturnAnalysisService};
