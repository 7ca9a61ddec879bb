use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Units counted in the meter dimension (compared lower-cased)
pub const METER_UNITS: &[&str] = &["米", "m", "meter"];

/// Units counted in the weight dimension (compared lower-cased)
pub const WEIGHT_UNITS: &[&str] = &["公斤", "kg", "kilogram"];

/// Statistical dimension an order's unit of measure falls into.
///
/// Units outside both sets are in neither bucket; those orders still count
/// toward the total order count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitBucket {
    Meter,
    Weight,
}

impl UnitBucket {
    pub fn units(&self) -> &'static [&'static str] {
        match self {
            UnitBucket::Meter => METER_UNITS,
            UnitBucket::Weight => WEIGHT_UNITS,
        }
    }

    /// Case-insensitive classification of a unit-of-measure string
    pub fn classify(unit: &str) -> Option<Self> {
        let unit = unit.to_lowercase();
        [UnitBucket::Meter, UnitBucket::Weight]
            .into_iter()
            .find(|bucket| bucket.units().contains(&unit.as_str()))
    }
}

/// Order-side aggregates over completed plans
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderSummary {
    pub total_orders: i64,
    pub total_meters: Decimal,
    pub total_weight: Decimal,
    pub meter_order_count: i64,
    pub weight_order_count: i64,
}

/// Refund subtotal for one (normalized) currency code
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CurrencyAmount {
    pub currency: String,
    pub total_amount: Decimal,
}

impl CurrencyAmount {
    pub fn new(currency: impl Into<String>, total_amount: Decimal) -> Self {
        Self {
            currency: currency.into(),
            total_amount,
        }
    }
}

/// Return-side aggregates; refund amounts stay in their original currencies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnSummary {
    pub returned_meters: Decimal,
    pub returned_weight: Decimal,
    pub currency_amounts: Vec<CurrencyAmount>,
    pub returned_order_count: i64,
}

impl ReturnSummary {
    pub fn amounts(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.currency_amounts
            .iter()
            .map(|a| (a.currency.as_str(), a.total_amount))
    }
}

/// Customer entry for the selection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOption {
    pub customer_no: String,
    pub customer_name: String,
}
