use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

use super::analysis_query::DateRange;

/// Returned share of a dimension, rendered as `"NN.NN%"` or `"N/A"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnRate {
    /// Percentage held at exactly two fractional digits
    Percent(Decimal),
    /// The dimension has no ordered quantity
    NotApplicable,
}

impl ReturnRate {
    pub fn percent(&self) -> Option<Decimal> {
        match self {
            ReturnRate::Percent(value) => Some(*value),
            ReturnRate::NotApplicable => None,
        }
    }
}

impl fmt::Display for ReturnRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnRate::Percent(value) => write!(f, "{}%", value),
            ReturnRate::NotApplicable => write!(f, "N/A"),
        }
    }
}

impl Serialize for ReturnRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Echo of what was actually executed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConditions {
    pub date_range: DateRange,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub customer_no: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_meters: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub returned_meters: Decimal,
    pub return_rate: ReturnRate,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_weight: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub returned_weight: Decimal,
    pub return_rate: ReturnRate,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountStats {
    /// Refunds across all recognized currencies, converted to RMB
    #[serde(rename = "totalAmountRMB", with = "rust_decimal::serde::float")]
    pub total_amount_rmb: Decimal,
    pub returned_order_count: i64,
}

/// Return analysis report for one customer filter and date window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnAnalysisReport {
    pub query_conditions: QueryConditions,
    pub meter_stats: MeterStats,
    pub weight_stats: WeightStats,
    pub amount_stats: AmountStats,
    pub total_orders: i64,
}
