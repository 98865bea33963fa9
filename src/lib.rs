use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod db;
pub mod maintenance_log;
pub mod report;

pub use crate::config::AppConfig;
pub use crate::db::AppState;

/// Embedded photos arrive base64-encoded inside the JSON body.
pub const JSON_BODY_LIMIT: usize = 32 * 1024 * 1024;

const START_PAGE: &str = "start.html";

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "Service",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Serve the front-end start page
pub async fn index(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let path = state.config.static_dir.join(START_PAGE);
    match NamedFile::open_async(&path).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            log::warn!("Start page {} unavailable: {}", path.display(), e);
            HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body("<h1>start.html not found</h1>")
        }
    }
}

/// JSON extractor settings shared by every endpoint.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            let message = format!("Invalid JSON body: {}", err);
            log::warn!("{}", message);
            let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
            actix_web::error::InternalError::from_response(err, response).into()
        })
}

/// Application routes, without the static file fallback.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/").route(web::get().to(index)))
        .configure(report::handlers::config)
        .configure(maintenance_log::handlers::config);
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health,
        crate::report::handlers::generate_pdf,
        crate::maintenance_log::handlers::list_logs,
        crate::maintenance_log::handlers::create_log,
        crate::maintenance_log::handlers::delete_log
    ),
    components(
        schemas(
            maintenance_log::models::LogRecord,
            maintenance_log::models::DeleteLogResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Report", description = "PDF maintenance report rendering."),
        (name = "Maintenance Logs", description = "Stored maintenance log endpoints."),
        (name = "Service", description = "Health and service endpoints.")
    )
)]
pub struct ApiDoc;

fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app_config = match AppConfig::from_env() {
        Ok(app_config) => app_config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let bind_addr = (app_config.host.clone(), app_config.port);
    let static_dir = app_config.static_dir.clone();
    let allowed_origins = app_config.allowed_origins.clone();

    let state = match AppState::new_with_config(app_config).await {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to initialize application state. Check DATABASE_URL. Error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };
    let store = state.store.clone();
    let app_state = web::Data::new(state);

    let prometheus = PrometheusMetricsBuilder::new("maintenance_report_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", bind_addr.0, bind_addr.1);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&allowed_origins))
            .app_data(app_state.clone())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(Files::new("/", static_dir.clone()))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind_addr)?
    .run()
    .await;

    store.close().await;
    log::info!("Server stopped");
    result
}
