// End-to-end return analysis through the service
//
// Runs the concrete scenarios against the in-memory repository: empty data,
// a perfect order, partial and multi-currency returns, date and customer
// exclusion, mixed units, and the failure/cancellation paths.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use fabricops::core::{AppError, CurrencyRates};
use fabricops::modules::return_analysis::models::{DateRange, ReturnAnalysisRequest, ReturnRate};
use fabricops::modules::return_analysis::services::{with_cancellation, ReturnAnalysisService};
use helpers::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

fn service(repository: InMemoryReturnAnalysisRepository) -> (ReturnAnalysisService, Arc<InMemoryReturnAnalysisRepository>) {
    let repository = Arc::new(repository);
    let service = ReturnAnalysisService::new(repository.clone(), Arc::new(CurrencyRates::default()));
    (service, repository)
}

fn perfect_order() -> PlanRecord {
    plan("O1", "CS1", "m", dec!(100), "2024-06-01")
}

#[tokio::test]
async fn test_empty_database_reports_zeros() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::default());

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.total_orders, 0);
    assert_eq!(report.meter_stats.total_meters, Decimal::ZERO);
    assert_eq!(report.meter_stats.returned_meters, Decimal::ZERO);
    assert_eq!(report.meter_stats.return_rate, ReturnRate::NotApplicable);
    assert_eq!(report.weight_stats.return_rate, ReturnRate::NotApplicable);
    assert_eq!(report.amount_stats.total_amount_rmb, Decimal::ZERO);
    assert_eq!(report.amount_stats.returned_order_count, 0);
}

#[tokio::test]
async fn test_single_order_without_returns() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(vec![perfect_order()], vec![]));

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.meter_stats.total_meters, dec!(100));
    assert_eq!(report.meter_stats.returned_meters, Decimal::ZERO);
    assert_eq!(report.meter_stats.return_rate.to_string(), "0.00%");
    assert_eq!(report.meter_stats.order_count, 1);
    assert_eq!(report.weight_stats.return_rate.to_string(), "N/A");
    assert_eq!(report.total_orders, 1);
}

#[tokio::test]
async fn test_partial_return_in_usd() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![perfect_order()],
        vec![return_of("O1", dec!(25), "USD", dec!(50))],
    ));

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.meter_stats.returned_meters, dec!(25));
    assert_eq!(report.meter_stats.return_rate.to_string(), "25.00%");
    assert_eq!(report.amount_stats.total_amount_rmb, dec!(400));
    assert_eq!(report.amount_stats.returned_order_count, 1);
}

#[tokio::test]
async fn test_multi_currency_codes_are_normalized() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![perfect_order()],
        vec![
            return_of("O1", dec!(5), "RMB", dec!(100)),
            return_of("O1", dec!(5), " usd ", dec!(10)),
        ],
    ));

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.amount_stats.total_amount_rmb, dec!(180));
    assert_eq!(report.amount_stats.returned_order_count, 1);
    assert_eq!(report.meter_stats.returned_meters, dec!(10));
}

#[tokio::test]
async fn test_orders_outside_window_are_excluded() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![
            plan("O1", "CS1", "m", dec!(100), "2024-01-01"),
            plan("O2", "CS1", "m", dec!(40), "2024-06-15"),
            plan("O3", "CS1", "m", dec!(70), "2024-12-31"),
        ],
        vec![
            return_of("O1", dec!(50), "RMB", dec!(500)),
            return_of("O2", dec!(4), "RMB", dec!(40)),
            return_of("O3", dec!(7), "RMB", dec!(70)),
        ],
    ));

    let request = ReturnAnalysisRequest::new("", DateRange::new("2024-06-01", "2024-06-30"));
    let report = service.analyze(&request).await.unwrap();

    assert_eq!(report.total_orders, 1);
    assert_eq!(report.meter_stats.total_meters, dec!(40));
    assert_eq!(report.meter_stats.returned_meters, dec!(4));
    assert_eq!(report.meter_stats.return_rate.to_string(), "10.00%");
    assert_eq!(report.amount_stats.total_amount_rmb, dec!(40));
    assert_eq!(report.query_conditions.date_range, DateRange::new("2024-06-01", "2024-06-30"));
}

#[tokio::test]
async fn test_mixed_unit_orders() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![
            plan("O1", "CS1", "m", dec!(100), "2024-06-01"),
            plan("O2", "CS1", "kg", dec!(50), "2024-06-02"),
        ],
        vec![
            return_of("O1", dec!(10), "RMB", dec!(1)),
            return_of("O2", dec!(10), "RMB", dec!(1)),
        ],
    ));

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.meter_stats.return_rate.to_string(), "10.00%");
    assert_eq!(report.weight_stats.return_rate.to_string(), "20.00%");
    assert_eq!(report.total_orders, 2);
    assert_eq!(report.meter_stats.order_count, 1);
    assert_eq!(report.weight_stats.order_count, 1);
    assert_eq!(report.amount_stats.returned_order_count, 2);
}

#[tokio::test]
async fn test_unclassified_units_count_only_toward_total_orders() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![
            plan("O1", "CS1", "M", dec!(100), "2024-06-01"),
            plan("O2", "CS1", "pcs", dec!(500), "2024-06-01"),
        ],
        vec![return_of("O2", dec!(50), "RMB", dec!(20))],
    ));

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.total_orders, 2);
    assert_eq!(report.meter_stats.order_count, 1);
    assert_eq!(report.weight_stats.order_count, 0);
    assert_eq!(report.meter_stats.returned_meters, Decimal::ZERO);
    // The refund still counts even though its quantity has no bucket
    assert_eq!(report.amount_stats.total_amount_rmb, dec!(20));
    assert_eq!(report.amount_stats.returned_order_count, 1);
}

#[tokio::test]
async fn test_incomplete_plans_and_currencyless_returns_are_ignored() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![perfect_order(), open_plan("O9", "CS1", "m", dec!(1000))],
        vec![
            return_of("O9", dec!(500), "RMB", dec!(5000)),
            return_without_currency("O1", dec!(30), dec!(300)),
            return_of("O1", dec!(30), "", dec!(300)),
        ],
    ));

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.total_orders, 1);
    assert_eq!(report.meter_stats.total_meters, dec!(100));
    assert_eq!(report.meter_stats.returned_meters, Decimal::ZERO);
    assert_eq!(report.amount_stats.total_amount_rmb, Decimal::ZERO);
    assert_eq!(report.amount_stats.returned_order_count, 0);
}

#[tokio::test]
async fn test_customer_filter_resolves_name() {
    let (service, repository) = service(InMemoryReturnAnalysisRepository::new(
        vec![perfect_order(), plan("O2", "CS2", "m", dec!(900), "2024-06-01")],
        vec![return_of("O2", dec!(900), "RMB", dec!(9000))],
    ));

    let report = service
        .analyze(&ReturnAnalysisRequest::new("CS1", DateRange::default()))
        .await
        .unwrap();

    assert_eq!(report.query_conditions.customer_no, "CS1");
    assert_eq!(report.query_conditions.customer_name, "CS1 Textiles");
    assert_eq!(report.total_orders, 1);
    assert_eq!(report.meter_stats.total_meters, dec!(100));
    assert_eq!(report.amount_stats.total_amount_rmb, Decimal::ZERO);
    assert_eq!(repository.lookup_count(), 1);
}

#[tokio::test]
async fn test_unfiltered_request_skips_customer_lookup() {
    let (service, repository) = service(InMemoryReturnAnalysisRepository::new(vec![perfect_order()], vec![]));

    let report = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap();

    assert_eq!(report.query_conditions.customer_name, "");
    assert_eq!(repository.lookup_count(), 0);
}

#[tokio::test]
async fn test_unknown_customer_yields_empty_report() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(vec![perfect_order()], vec![]));

    let report = service
        .analyze(&ReturnAnalysisRequest::new("NOPE", DateRange::default()))
        .await
        .unwrap();

    assert_eq!(report.total_orders, 0);
    assert_eq!(report.query_conditions.customer_no, "NOPE");
    assert_eq!(report.query_conditions.customer_name, "");
}

#[tokio::test]
async fn test_customer_lookup_failure_is_not_fatal() {
    let (service, repository) = service(InMemoryReturnAnalysisRepository {
        fail_customer_lookup: true,
        ..InMemoryReturnAnalysisRepository::new(vec![perfect_order()], vec![])
    });

    let report = service
        .analyze(&ReturnAnalysisRequest::new("CS1", DateRange::default()))
        .await
        .unwrap();

    assert_eq!(report.query_conditions.customer_name, "");
    assert_eq!(report.total_orders, 1);
    assert_eq!(repository.lookup_count(), 1);
}

#[tokio::test]
async fn test_summary_failures_are_fatal() {
    let (orders_down, _) = service(InMemoryReturnAnalysisRepository {
        fail_order_summary: true,
        ..InMemoryReturnAnalysisRepository::new(vec![perfect_order()], vec![])
    });
    let err = orders_down.analyze(&ReturnAnalysisRequest::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    let (returns_down, _) = service(InMemoryReturnAnalysisRepository {
        fail_return_summary: true,
        ..InMemoryReturnAnalysisRepository::new(vec![perfect_order()], vec![])
    });
    let err = returns_down.analyze(&ReturnAnalysisRequest::default()).await.unwrap_err();
    assert!(err.to_string().contains("Ord_ReturnGoodsApply"));
}

#[tokio::test]
async fn test_refund_too_large_to_convert_is_internal_error() {
    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![perfect_order()],
        vec![return_of("O1", dec!(1), "USD", Decimal::MAX / dec!(4))],
    ));

    let err = service.analyze(&ReturnAnalysisRequest::default()).await.unwrap_err();

    assert!(matches!(err, AppError::Internal(_)));
    assert!(err.to_string().contains("USD"));
}

#[tokio::test]
async fn test_validation_happens_before_any_query() {
    let (service, repository) = service(InMemoryReturnAnalysisRepository {
        fail_order_summary: true,
        ..InMemoryReturnAnalysisRepository::default()
    });

    let request = ReturnAnalysisRequest::new("CS1", DateRange::new("2024-06-30", "2024-06-01"));
    let err = service.analyze(&request).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(repository.lookup_count(), 0);
}

#[tokio::test]
async fn test_cancellation_abandons_slow_analysis() {
    let (service, _) = service(InMemoryReturnAnalysisRepository {
        delay: Some(Duration::from_secs(30)),
        ..InMemoryReturnAnalysisRepository::new(vec![perfect_order()], vec![])
    });

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let request = ReturnAnalysisRequest::default();
    let started = std::time::Instant::now();
    let result = with_cancellation(&token, service.analyze(&request)).await;

    assert!(matches!(result, Err(AppError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_list_customers_is_sorted_by_name() {
    let mut first = plan("O1", "CS2", "m", dec!(1), "2024-06-01");
    first.customer_name = "Beta Mills".to_string();
    let mut second = plan("O2", "CS1", "m", dec!(1), "2024-06-01");
    second.customer_name = "Alpha Dyeing".to_string();

    let (service, _) = service(InMemoryReturnAnalysisRepository::new(
        vec![first, second, open_plan("O3", "CS3", "m", dec!(1))],
        vec![],
    ));

    let customers = service.list_customers().await.unwrap();
    let names: Vec<&str> = customers.iter().map(|c| c.customer_name.as_str()).collect();
    assert_eq!(names, ["Alpha Dyeing", "Beta Mills"]);
    assert_eq!(customers[0].customer_no, "CS1");
}
