use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{AppError, CurrencyRates, Result};
use crate::modules::return_analysis::models::{
    CustomerOption, ReturnAnalysisReport, ReturnAnalysisRequest,
};
use crate::modules::return_analysis::repositories::ReturnAnalysisRepository;
use crate::modules::return_analysis::services::report_assembler::assemble_report;

/// Run `operation` until it finishes or `cancel` fires.
///
/// On cancellation the operation future is dropped, abandoning any
/// in-flight repository call, and [`AppError::Cancelled`] is returned.
pub async fn with_cancellation<T, F>(cancel: &CancellationToken, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("Return analysis cancelled by caller");
            Err(AppError::Cancelled)
        }
        result = operation => result,
    }
}

/// Produces return analysis reports from repository aggregates
pub struct ReturnAnalysisService {
    repository: Arc<dyn ReturnAnalysisRepository>,
    rates: Arc<CurrencyRates>,
}

impl ReturnAnalysisService {
    pub fn new(repository: Arc<dyn ReturnAnalysisRepository>, rates: Arc<CurrencyRates>) -> Self {
        Self { repository, rates }
    }

    /// Customers available for filtering
    pub async fn list_customers(&self) -> Result<Vec<CustomerOption>> {
        let customers = self.repository.list_customers().await?;
        debug!(count = customers.len(), "Customer list loaded");
        Ok(customers)
    }

    /// Generate the return analysis report for `request`.
    ///
    /// Validation and both summary queries are fatal; the customer name
    /// lookup is best-effort and leaves the name empty on failure.
    pub async fn analyze(&self, request: &ReturnAnalysisRequest) -> Result<ReturnAnalysisReport> {
        let query = request.to_query()?;

        info!(
            customer_no = query.customer_filter().unwrap_or("*"),
            window = ?query.window,
            "Generating return analysis"
        );

        let (orders, returns) = tokio::try_join!(
            self.repository.order_summary(&query),
            self.repository.return_summary(&query),
        )?;

        let customer_name = match query.customer_filter() {
            Some(customer_no) => self.resolve_customer_name(customer_no).await,
            None => String::new(),
        };

        let total_amount_rmb = self.rates.total_rmb(returns.amounts())?;

        let report = assemble_report(request, customer_name, &orders, &returns, total_amount_rmb)?;

        info!(
            total_orders = report.total_orders,
            meter_rate = %report.meter_stats.return_rate,
            weight_rate = %report.weight_stats.return_rate,
            returned_orders = report.amount_stats.returned_order_count,
            "Return analysis generated"
        );

        Ok(report)
    }

    async fn resolve_customer_name(&self, customer_no: &str) -> String {
        match self.repository.find_customer(customer_no).await {
            Ok(Some(customer)) => customer.customer_name,
            Ok(None) => {
                debug!(customer_no, "No completed plans for customer");
                String::new()
            }
            Err(err) => {
                warn!(customer_no, error = %err, "Customer lookup failed, continuing without name");
                String::new()
            }
        }
    }
}
