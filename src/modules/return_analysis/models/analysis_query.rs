use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::AppError;

/// Layout of every date accepted or echoed by the analysis endpoints
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// Reasons a return analysis request is rejected before touching the database
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("start date and end date must be provided together or both omitted")]
    DateRangeIncomplete,

    #[error("invalid {field} date '{value}', expected YYYY-MM-DD")]
    DateFormatInvalid { field: &'static str, value: String },

    #[error("end date {end} must not be earlier than start date {start}")]
    DateRangeInverted { start: NaiveDate, end: NaiveDate },
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Absent and `null` both mean "not provided"
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Date window exactly as the caller sent it (empty string = not provided)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Validate the range and resolve it into a [`DateWindow`].
    ///
    /// Checks run in order and the first failure wins: completeness,
    /// then format, then ordering.
    pub fn validate(&self) -> Result<DateWindow, QueryError> {
        match (self.start.is_empty(), self.end.is_empty()) {
            (true, true) => Ok(DateWindow::Unbounded),
            (false, true) | (true, false) => Err(QueryError::DateRangeIncomplete),
            (false, false) => {
                let start = parse_date("start", &self.start)?;
                let end = parse_date("end", &self.end)?;
                if end < start {
                    return Err(QueryError::DateRangeInverted { start, end });
                }
                Ok(DateWindow::Between { start, end })
            }
        }
    }
}

/// Strict `YYYY-MM-DD`: four-digit year, zero-padded month and day
fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    well_formed
        .then(|| NaiveDate::parse_from_str(value, DATE_LAYOUT).ok())
        .flatten()
        .ok_or_else(|| QueryError::DateFormatInvalid {
            field,
            value: value.to_string(),
        })
}

/// Resolved date filter applied to the affirmation date of each order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// No date filter
    Unbounded,
    /// Inclusive on both ends
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateWindow {
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            DateWindow::Unbounded => None,
            DateWindow::Between { start, end } => Some((start, end)),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateWindow::Unbounded => true,
            DateWindow::Between { start, end } => start <= date && date <= end,
        }
    }
}

/// Body of `POST /return-analysis/analysis`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnAnalysisRequest {
    /// Customer code, empty for all customers
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_range: DateRange,
}

impl ReturnAnalysisRequest {
    pub fn new(customer_no: impl Into<String>, date_range: DateRange) -> Self {
        Self {
            customer_no: customer_no.into(),
            date_range,
        }
    }

    /// Validate the request and turn it into the filter the repository runs
    pub fn to_query(&self) -> Result<AnalysisQuery, QueryError> {
        let window = self.date_range.validate()?;
        let customer_no = (!self.customer_no.is_empty()).then(|| self.customer_no.clone());

        Ok(AnalysisQuery {
            customer_no,
            window,
        })
    }
}

/// Validated filter shared by every aggregation query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisQuery {
    pub customer_no: Option<String>,
    pub window: DateWindow,
}

impl AnalysisQuery {
    /// All customers, all dates
    pub fn unfiltered() -> Self {
        Self {
            customer_no: None,
            window: DateWindow::Unbounded,
        }
    }

    pub fn customer_filter(&self) -> Option<&str> {
        self.customer_no.as_deref()
    }
}
