use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::traits::Page;
use crate::core::AppError;
use crate::modules::processes::models::{CreateProcessRequest, UpdateProcessRequest};
use crate::modules::processes::services::ProcessService;

/// Query parameters for listing processes
#[derive(Debug, Deserialize)]
pub struct ListProcessesQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

/// POST /process
pub async fn create_process(
    service: web::Data<Arc<ProcessService>>,
    request: web::Json<CreateProcessRequest>,
) -> Result<HttpResponse, AppError> {
    let process = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(process))
}

/// GET /process
pub async fn list_processes(
    service: web::Data<Arc<ProcessService>>,
    query: web::Query<ListProcessesQuery>,
) -> Result<HttpResponse, AppError> {
    let processes = service.list(Page::new(query.limit, query.offset)).await?;
    Ok(HttpResponse::Ok().json(processes))
}

/// GET /process/{id}
pub async fn get_process(
    service: web::Data<Arc<ProcessService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let process = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(process))
}

/// POST /process/{id}
pub async fn update_process(
    service: web::Data<Arc<ProcessService>>,
    path: web::Path<i64>,
    request: web::Json<UpdateProcessRequest>,
) -> Result<HttpResponse, AppError> {
    service
        .update(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "updated" })))
}

/// DELETE /process/{id}
pub async fn delete_process(
    service: web::Data<Arc<ProcessService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "deleted" })))
}

/// Configure process routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/process")
            .route("", web::post().to(create_process))
            .route("", web::get().to(list_processes))
            .route("/{id}", web::get().to(get_process))
            .route("/{id}", web::post().to(update_process))
            .route("/{id}", web::delete().to(delete_process)),
    );
}
