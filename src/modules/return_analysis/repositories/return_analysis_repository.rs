// Aggregation queries behind the return analysis report
//
// Reads two external relations owned by the upstream planning system:
// - v_md_plan: completed-plan view (one row per plan/order)
// - "Ord_ReturnGoodsApply": return-goods applications keyed by "PlanNo"
//
// Identifiers are quoted exactly as they exist in the database. All filtering
// and grouping happens in SQL; each call yields a single aggregate.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::Result;
use crate::modules::return_analysis::models::{
    AnalysisQuery, CurrencyAmount, CustomerOption, OrderSummary, ReturnSummary, UnitBucket,
};

/// Schedule state the planning system assigns to completed plans
pub const COMPLETED_SCHEDULE: i32 = 99;

/// Read-only aggregation operations the analysis engine depends on
#[async_trait]
pub trait ReturnAnalysisRepository: Send + Sync {
    /// Distinct customers with at least one completed plan, ordered by name
    async fn list_customers(&self) -> Result<Vec<CustomerOption>>;

    /// Order-side totals over completed plans matching `query`
    async fn order_summary(&self, query: &AnalysisQuery) -> Result<OrderSummary>;

    /// Return-side totals for completed plans matching `query`.
    /// Refund amounts are grouped by currency and left unconverted.
    async fn return_summary(&self, query: &AnalysisQuery) -> Result<ReturnSummary>;

    /// Representative name for a customer code, `None` if it has no completed plans
    async fn find_customer(&self, customer_no: &str) -> Result<Option<CustomerOption>>;
}

/// SQL literal list for a unit bucket, e.g. `'米', 'm', 'meter'`
fn unit_list(bucket: UnitBucket) -> String {
    bucket
        .units()
        .iter()
        .map(|unit| format!("'{}'", unit.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Append the completed-plan predicate: schedule sentinel, optional customer,
/// optional inclusive affirmation-date window.
///
/// `prefix` qualifies plan columns when the view is aliased (`"o."`).
fn push_plan_filter(builder: &mut QueryBuilder<'_, Postgres>, prefix: &str, query: &AnalysisQuery) {
    builder.push(format!(r#" WHERE {prefix}"Schedule" = "#));
    builder.push_bind(COMPLETED_SCHEDULE);

    if let Some(customer_no) = query.customer_filter() {
        builder.push(format!(r#" AND {prefix}"CustomNo" = "#));
        builder.push_bind(customer_no.to_string());
    }

    if let Some((start, end)) = query.window.bounds() {
        builder.push(format!(
            r#" AND TO_DATE({prefix}"AffirmDate", 'YYYY-MM-DD') BETWEEN "#
        ));
        builder.push_bind(start);
        builder.push(" AND ");
        builder.push_bind(end);
    }
}

/// Start of every return-side query: returns joined to their plan,
/// restricted to rows that carry a currency.
fn returns_joined_to_plans(select: &str, query: &AnalysisQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        r#"SELECT {select}
        FROM "Ord_ReturnGoodsApply" r
        JOIN v_md_plan o ON r."PlanNo" = o."Planno""#
    ));
    push_plan_filter(&mut builder, "o.", query);
    builder.push(r#" AND r."Currency" IS NOT NULL AND r."Currency" != ''"#);
    builder
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_no: Option<String>,
    customer_name: Option<String>,
}

impl From<CustomerRow> for CustomerOption {
    fn from(row: CustomerRow) -> Self {
        CustomerOption {
            customer_no: row.customer_no.unwrap_or_default(),
            customer_name: row.customer_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, sqlx::FromRow)]
struct ReturnQuantityRow {
    returned_meters: rust_decimal::Decimal,
    returned_weight: rust_decimal::Decimal,
    returned_order_count: i64,
}

/// PostgreSQL implementation of [`ReturnAnalysisRepository`]
#[derive(Clone)]
pub struct PgReturnAnalysisRepository {
    pool: PgPool,
}

impl PgReturnAnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReturnAnalysisRepository for PgReturnAnalysisRepository {
    #[tracing::instrument(skip(self))]
    async fn list_customers(&self) -> Result<Vec<CustomerOption>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT "CustomNo" AS customer_no, MAX("CustomerName") AS customer_name
            FROM v_md_plan
            WHERE "Schedule" = $1
            GROUP BY "CustomNo"
            ORDER BY customer_name ASC
            "#,
        )
        .bind(COMPLETED_SCHEDULE)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CustomerOption::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn order_summary(&self, query: &AnalysisQuery) -> Result<OrderSummary> {
        let meter = unit_list(UnitBucket::Meter);
        let weight = unit_list(UnitBucket::Weight);

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            r#"SELECT
            COUNT(DISTINCT "Planno") AS total_orders,
            COALESCE(SUM(CASE WHEN LOWER("Unit") IN ({meter}) THEN "TotalQuantity" ELSE 0 END), 0)::NUMERIC AS total_meters,
            COALESCE(SUM(CASE WHEN LOWER("Unit") IN ({weight}) THEN "TotalQuantity" ELSE 0 END), 0)::NUMERIC AS total_weight,
            COUNT(DISTINCT CASE WHEN LOWER("Unit") IN ({meter}) THEN "Planno" END) AS meter_order_count,
            COUNT(DISTINCT CASE WHEN LOWER("Unit") IN ({weight}) THEN "Planno" END) AS weight_order_count
            FROM v_md_plan"#
        ));
        push_plan_filter(&mut builder, "", query);

        let summary = builder
            .build_query_as::<OrderSummary>()
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            total_orders = summary.total_orders,
            meter_orders = summary.meter_order_count,
            weight_orders = summary.weight_order_count,
            "Order summary fetched"
        );

        Ok(summary)
    }

    #[tracing::instrument(skip(self))]
    async fn return_summary(&self, query: &AnalysisQuery) -> Result<ReturnSummary> {
        let meter = unit_list(UnitBucket::Meter);
        let weight = unit_list(UnitBucket::Weight);

        let mut quantities = returns_joined_to_plans(
            &format!(
                r#"COALESCE(SUM(CASE WHEN LOWER(o."Unit") IN ({meter}) THEN r."TotalQuantity" ELSE 0 END), 0)::NUMERIC AS returned_meters,
            COALESCE(SUM(CASE WHEN LOWER(o."Unit") IN ({weight}) THEN r."TotalQuantity" ELSE 0 END), 0)::NUMERIC AS returned_weight,
            COUNT(DISTINCT r."PlanNo") AS returned_order_count"#
            ),
            query,
        );

        // An aggregate without GROUP BY yields one row; zero rows still means zeros.
        let totals = quantities
            .build_query_as::<ReturnQuantityRow>()
            .fetch_optional(&self.pool)
            .await?
            .unwrap_or_default();

        let mut amounts = returns_joined_to_plans(
            r#"UPPER(TRIM(r."Currency")) AS currency,
            COALESCE(SUM(r."TotalAmount"), 0)::NUMERIC AS total_amount"#,
            query,
        );
        amounts.push(r#" GROUP BY UPPER(TRIM(r."Currency"))"#);

        let currency_amounts = amounts
            .build_query_as::<CurrencyAmount>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            returned_orders = totals.returned_order_count,
            currencies = currency_amounts.len(),
            "Return summary fetched"
        );

        Ok(ReturnSummary {
            returned_meters: totals.returned_meters,
            returned_weight: totals.returned_weight,
            currency_amounts,
            returned_order_count: totals.returned_order_count,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn find_customer(&self, customer_no: &str) -> Result<Option<CustomerOption>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT "CustomNo" AS customer_no, MAX("CustomerName") AS customer_name
            FROM v_md_plan
            WHERE "CustomNo" = $1 AND "Schedule" = $2
            GROUP BY "CustomNo"
            "#,
        )
        .bind(customer_no)
        .bind(COMPLETED_SCHEDULE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CustomerOption::from))
    }
}
