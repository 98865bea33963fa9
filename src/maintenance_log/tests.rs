//! Handler tests for the maintenance log endpoints

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::json;

use crate::config::AppConfig;
use crate::db::{AppState, MemoryLogStore};
use crate::maintenance_log::models::LogRecord;
use crate::ErrorResponse;

fn state() -> web::Data<AppState> {
    let state = AppState::new_with_store(AppConfig::default(), Arc::new(MemoryLogStore::new()))
        .expect("state");
    web::Data::new(state)
}

fn payload(id: &str, timestamp: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Leak",
        "category": "plumbing",
        "location": "Rm 4",
        "description": "Pipe burst",
        "createdBy": "A. Smith",
        "timestamp": timestamp,
        "images": []
    })
}

#[actix_web::test]
async fn test_create_then_list() {
    let app = test::init_service(
        App::new()
            .app_data(state())
            .configure(crate::configure_routes),
    )
    .await;

    for (id, ts) in [("L1", "2024-01-01"), ("L2", "2024-05-01")] {
        let req = test::TestRequest::post()
            .uri("/api/logs")
            .set_json(payload(id, ts))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/logs").to_request();
    let logs: Vec<LogRecord> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = logs.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["L2", "L1"]);
    assert_eq!(logs[0].created_by, "A. Smith");
}

#[actix_web::test]
async fn test_author_alias_is_accepted() {
    let app = test::init_service(
        App::new()
            .app_data(state())
            .configure(crate::configure_routes),
    )
    .await;

    let mut body = payload("L1", "2024-01-01");
    let author = body["createdBy"].take();
    body.as_object_mut().unwrap().remove("createdBy");
    body["author"] = author;

    let req = test::TestRequest::post()
        .uri("/api/logs")
        .set_json(body)
        .to_request();
    let stored: LogRecord = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored.created_by, "A. Smith");
}

#[actix_web::test]
async fn test_duplicate_id_conflicts_and_keeps_store() {
    let data = state();
    let app = test::init_service(
        App::new()
            .app_data(data.clone())
            .configure(crate::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/logs")
        .set_json(payload("L1", "2024-01-01"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let mut dup = payload("L1", "2024-09-09");
    dup["title"] = json!("Different");
    let req = test::TestRequest::post()
        .uri("/api/logs")
        .set_json(dup)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Conflict");

    let logs = data.store.list().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].title, "Leak");
}

#[actix_web::test]
async fn test_missing_fields_are_rejected() {
    let data = state();
    let app = test::init_service(
        App::new()
            .app_data(data.clone())
            .configure(crate::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/logs")
        .set_json(json!({ "id": "L1", "title": "Leak" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.message.contains("[category]"));
    assert!(body.message.contains("[createdBy]"));
    assert!(data.store.list().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_delete_then_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(state())
            .configure(crate::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/logs")
        .set_json(payload("L1", "2024-01-01"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete().uri("/api/logs/L1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], "L1");

    let req = test::TestRequest::delete().uri("/api/logs/L1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
