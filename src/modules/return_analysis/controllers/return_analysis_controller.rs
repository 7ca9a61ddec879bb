use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::AppError;
use crate::modules::return_analysis::models::ReturnAnalysisRequest;
use crate::modules::return_analysis::services::{with_cancellation, ReturnAnalysisService};

/// GET /return-analysis/customers
///
/// Customers that have at least one completed plan, for the filter dropdown.
pub async fn list_customers(
    service: web::Data<Arc<ReturnAnalysisService>>,
    shutdown: web::Data<CancellationToken>,
) -> Result<HttpResponse, AppError> {
    let customers = with_cancellation(&shutdown.child_token(), service.list_customers())
        .await
        .inspect_err(|e| error!("Failed to list customers: {}", e))?;

    Ok(HttpResponse::Ok().json(customers))
}

/// POST /return-analysis/analysis
///
/// Meter, weight and refund-amount statistics for an optional customer and
/// optional affirmation-date window. `dateRange.start` and `dateRange.end`
/// must be sent together or not at all.
pub async fn analyze_returns(
    service: web::Data<Arc<ReturnAnalysisService>>,
    shutdown: web::Data<CancellationToken>,
    request: web::Json<ReturnAnalysisRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    let report = with_cancellation(&shutdown.child_token(), service.analyze(&request))
        .await
        .inspect_err(|e| match e {
            AppError::Validation(msg) => info!("Rejected return analysis request: {}", msg),
            other => error!("Failed to generate return analysis: {}", other),
        })?;

    Ok(HttpResponse::Ok().json(report))
}

/// Configure routes for the return analysis module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/return-analysis")
            .route("/customers", web::get().to(list_customers))
            .route("/analysis", web::post().to(analyze_returns)),
    );
}
