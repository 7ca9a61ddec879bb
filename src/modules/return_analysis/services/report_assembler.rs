use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};
use crate::modules::return_analysis::models::{
    AmountStats, MeterStats, OrderSummary, QueryConditions, ReturnAnalysisReport,
    ReturnAnalysisRequest, ReturnRate, ReturnSummary, WeightStats,
};

/// Share of `total` that came back, as a percentage with two fractional
/// digits (round half away from zero).
///
/// Undefined (`N/A`) when nothing was ordered. Not capped at 100: returns
/// exceeding the ordered quantity are reported as-is. A ratio too large for
/// a `Decimal` is an internal error.
pub fn return_rate(returned: Decimal, total: Decimal) -> Result<ReturnRate> {
    if total <= Decimal::ZERO {
        return Ok(ReturnRate::NotApplicable);
    }

    let mut percent = returned
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| {
            tracing::warn!(%returned, %total, "Return rate overflowed");
            AppError::internal(format!("return rate of {} over {} is out of range", returned, total))
        })?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    percent.rescale(2);
    Ok(ReturnRate::Percent(percent))
}

/// Build the report from the validated request, the two summaries and the
/// refund total already converted to RMB.
pub fn assemble_report(
    request: &ReturnAnalysisRequest,
    customer_name: String,
    orders: &OrderSummary,
    returns: &ReturnSummary,
    total_amount_rmb: Decimal,
) -> Result<ReturnAnalysisReport> {
    Ok(ReturnAnalysisReport {
        query_conditions: QueryConditions {
            date_range: request.date_range.clone(),
            customer_no: request.customer_no.clone(),
            customer_name,
        },
        meter_stats: MeterStats {
            total_meters: orders.total_meters,
            returned_meters: returns.returned_meters,
            return_rate: return_rate(returns.returned_meters, orders.total_meters)?,
            order_count: orders.meter_order_count,
        },
        weight_stats: WeightStats {
            total_weight: orders.total_weight,
            returned_weight: returns.returned_weight,
            return_rate: return_rate(returns.returned_weight, orders.total_weight)?,
            order_count: orders.weight_order_count,
        },
        amount_stats: AmountStats {
            total_amount_rmb,
            returned_order_count: returns.returned_order_count,
        },
        total_orders: orders.total_orders,
    })
}
