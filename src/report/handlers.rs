use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse, Responder};

use super::common::usable_logo_url;
use super::{RenderedDocument, ReportError};
use crate::maintenance_log::models::LogRecord;
use crate::{AppState, ErrorResponse};

/// Render a maintenance report PDF from a submitted record
#[utoipa::path(
    post,
    path = "/generate-pdf",
    tag = "Report",
    request_body = LogRecord,
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Report rendering failed", body = ErrorResponse)
    )
)]
pub async fn generate_pdf(
    state: web::Data<AppState>,
    body: web::Json<LogRecord>,
) -> impl Responder {
    let record = body.into_inner();
    log::info!(
        "Generating report for log {:?} with {} photo(s)",
        record.id,
        record.images.len()
    );

    let logo = match usable_logo_url(record.logo_url.as_deref()) {
        Some(url) => state.fetcher.fetch(url).await,
        None => None,
    };

    let composer = state.composer.clone();
    let rendered: Result<RenderedDocument, ReportError> =
        match web::block(move || composer.compose(&record, logo.as_deref())).await {
            Ok(result) => result,
            Err(e) => Err(ReportError::Worker(e.to_string())),
        };

    match rendered {
        Ok(document) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition::attachment(document.filename))
            .body(document.pdf),
        Err(e) => {
            log::error!("Failed to render report: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&format!("Failed to generate PDF: {}", e)))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generate-pdf").route(web::post().to(generate_pdf)));
}
