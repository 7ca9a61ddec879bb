pub mod return_analysis_repository;

pub use return_analysis_repository::{
    PgReturnAnalysisRepository, ReturnAnalysisRepository, COMPLETED_SCHEDULE,
};
