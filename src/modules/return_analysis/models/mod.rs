pub mod analysis_query;
pub mod report;
pub mod summary;

pub use analysis_query::{AnalysisQuery, DateRange, DateWindow, QueryError, ReturnAnalysisRequest};
pub use report::{
    AmountStats, MeterStats, QueryConditions, ReturnAnalysisReport, ReturnRate, WeightStats,
};
pub use summary::{CurrencyAmount, CustomerOption, OrderSummary, ReturnSummary, UnitBucket};
