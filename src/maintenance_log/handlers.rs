use actix_web::{web, HttpResponse, Responder};

use super::models::{DeleteLogResponse, LogRecord};
use crate::db::StoreError;
use crate::{AppState, ErrorResponse};

/// List every stored maintenance log, newest first
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Maintenance Logs",
    responses(
        (status = 200, description = "All maintenance logs", body = Vec<LogRecord>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_logs(state: web::Data<AppState>) -> impl Responder {
    match state.store.list().await {
        Ok(logs) => HttpResponse::Ok().json(logs),
        Err(e) => {
            log::error!("Failed to list maintenance logs: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to load maintenance logs"))
        }
    }
}

/// Store a new maintenance log
#[utoipa::path(
    post,
    path = "/api/logs",
    tag = "Maintenance Logs",
    request_body = LogRecord,
    responses(
        (status = 201, description = "Log stored", body = LogRecord),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "A log with this id already exists", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn create_log(
    state: web::Data<AppState>,
    body: web::Json<LogRecord>,
) -> impl Responder {
    let record = body.into_inner();

    if let Err(message) = record.validate() {
        log::warn!("Rejected maintenance log: {}", message);
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    match state.store.insert(record).await {
        Ok(stored) => {
            log::info!("Stored maintenance log {}", stored.id);
            HttpResponse::Created().json(stored)
        }
        Err(StoreError::Conflict(id)) => HttpResponse::Conflict().json(ErrorResponse::conflict(
            &format!("Maintenance log '{}' already exists", id),
        )),
        Err(e) => {
            log::error!("Failed to store maintenance log: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to store maintenance log"))
        }
    }
}

/// Delete a maintenance log by id
#[utoipa::path(
    delete,
    path = "/api/logs/{id}",
    tag = "Maintenance Logs",
    params(
        ("id" = String, Path, description = "Maintenance log id")
    ),
    responses(
        (status = 200, description = "Log deleted", body = DeleteLogResponse),
        (status = 404, description = "No log with this id", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn delete_log(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match state.store.delete(&id).await {
        Ok(()) => {
            log::info!("Deleted maintenance log {}", id);
            HttpResponse::Ok().json(DeleteLogResponse {
                message: "Maintenance log deleted".to_string(),
                id,
            })
        }
        Err(StoreError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse::not_found(
            &format!("Maintenance log '{}' not found", id),
        )),
        Err(e) => {
            log::error!("Failed to delete maintenance log {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to delete maintenance log"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/logs")
                    .route(web::get().to(list_logs))
                    .route(web::post().to(create_log)),
            )
            .service(web::resource("/logs/{id}").route(web::delete().to(delete_log))),
    );
}
