use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use tokio_util::sync::CancellationToken;

use fabricops::config::Config;
use fabricops::middleware::{json_error_handler, ErrorHandler, RequestId};
use fabricops::modules::{health, processes, return_analysis};
use fabricops::processes::{PgProcessRepository, ProcessService};
use fabricops::return_analysis::{PgReturnAnalysisRepository, ReturnAnalysisService};
use fabricops::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Configuration comes first: the log level and format live in it
    let config = Config::from_env().map_err(std::io::Error::other)?;
    config.validate().map_err(std::io::Error::other)?;

    telemetry::init(&config.app);

    tracing::info!("Starting FabricOps");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let db_pool = config
        .database
        .create_pool()
        .await
        .map_err(std::io::Error::other)?;

    let rates = Arc::new(config.analytics.currency_rates.clone());
    let return_analysis_service = Arc::new(ReturnAnalysisService::new(
        Arc::new(PgReturnAnalysisRepository::new(db_pool.clone())),
        rates,
    ));
    let process_service = Arc::new(ProcessService::new(Arc::new(
        PgProcessRepository::new(db_pool.clone()),
    )));

    // Cancelled on ctrl-c; in-flight analyses observe child tokens of it
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        actix_web::rt::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                shutdown.cancel();
            }
        });
    }

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(return_analysis_service.clone()))
            .app_data(web::Data::new(process_service.clone()))
            .app_data(web::Data::new(shutdown.clone()))
            .configure(health::configure)
            .configure(return_analysis::configure)
            .configure(processes::configure)
            .route("/", web::get().to(index))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "FabricOps",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
