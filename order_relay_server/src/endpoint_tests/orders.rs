use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use order_relay_engine::{
    delivery::DeliveryConfig,
    relay_objects::{OrderMessages, SalesSummary},
    test_utils::fakes::{RecordingChannel, RecordingStatusUpdater},
    IngestApi,
    IngestConfig,
    MemoryDocumentStore,
    OrderQueryApi,
};
use relay_common::Secret;
use serde_json::{json, Value};

use super::{helpers::get_request, mocks::MockStore};
use crate::{config::AuthConfig, server::configure_routes};

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let store = MemoryDocumentStore::new();
    let (status, body) = get_request("", "/health", configure(store, AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(r#"{"ok":true,"ts":""#));
}

#[actix_web::test]
async fn order_message_by_number() {
    let _ = env_logger::try_init().ok();
    let store = seeded_store().await;
    let (status, body) =
        get_request("", "/api/order/1012/message", configure(store.clone(), AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let message = serde_json::from_str::<Value>(&body).unwrap();
    assert_eq!(message["order_number"], json!("1012"));
    assert!(message["text"].as_str().unwrap().starts_with("Pedido 1012"));

    // The upstream id works too
    let path = "/api/order/13/message";
    let (status, body) = get_request("", path, configure(store, AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Pedido 1013"));
}

#[actix_web::test]
async fn unknown_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_get().times(1).returning(|_, _| Ok(None));
    store.expect_query().times(1).returning(|_, _| Ok(vec![]));
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(OrderQueryApi::new(store)));
        configure_routes::<MockStore, RecordingChannel, RecordingStatusUpdater>(cfg, &AuthConfig::default());
    };
    let (status, body) = get_request("", "/api/order/9999/message", configure).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order 9999 was not found"}"#);
}

#[actix_web::test]
async fn messages_in_date_range() {
    let _ = env_logger::try_init().ok();
    let store = seeded_store().await;
    let path = "/api/orders/messages?from=2024-05-01&to=2024-05-02";
    let (status, body) = get_request("", path, configure(store.clone(), AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let page = serde_json::from_str::<OrderMessages>(&body).unwrap();
    assert_eq!(page.from, "2024-05-01T00:00:00");
    assert_eq!(page.to, "2024-05-02T23:59:59");
    let numbers = page.results.iter().map(|m| m.order_number.as_str()).collect::<Vec<_>>();
    assert_eq!(numbers, vec!["1011", "1012"]);

    let path = "/api/orders/messages?desde=2024-04-01&hasta=2024-06-01&limit=1";
    let (status, body) = get_request("", path, configure(store, AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let page = serde_json::from_str::<OrderMessages>(&body).unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].order_number, "1010");
}

#[actix_web::test]
async fn invalid_dates_are_rejected() {
    let _ = env_logger::try_init().ok();
    let store = MemoryDocumentStore::new();
    let path = "/api/orders/messages?from=yesterday&to=2024-05-02";
    let (status, body) = get_request("", path, configure(store.clone(), AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid query parameters. Invalid date: yesterday"}"#);

    let (status, _) = get_request("", "/api/orders/messages", configure(store.clone(), AuthConfig::default()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let path = "/api/reports/sales?from=2024-05-01&to=01/06/2024";
    let (status, _) = get_request("", path, configure(store, AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn sales_report() {
    let _ = env_logger::try_init().ok();
    let store = seeded_store().await;
    let path = "/api/reports/sales?from=2024-05-01&to=2024-05-03";
    let (status, body) = get_request("", path, configure(store.clone(), AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let summary = serde_json::from_str::<SalesSummary>(&body).unwrap();
    assert_eq!(summary.total_orders, 3);
    assert!(summary.status.is_none());
    let top = summary.top_products.iter().map(|p| (p.name.as_str(), p.qty)).collect::<Vec<_>>();
    assert_eq!(top, vec![("Válvula", 9), ("Codo", 5), ("Tubo PVC", 2)]);

    let path = "/api/reports/sales?from=2024-04-30&to=2024-05-03&status=completed";
    let (status, body) = get_request("", path, configure(store, AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let summary = serde_json::from_str::<SalesSummary>(&body).unwrap();
    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.status.as_deref(), Some("completed"));
    assert!((summary.total_amount - 62500.0).abs() < 1e-6);
}

#[actix_web::test]
async fn api_requires_shared_secret() {
    let _ = env_logger::try_init().ok();
    let store = seeded_store().await;
    let auth = AuthConfig { shared_secret: Secret::new("s3cret".into()), ..Default::default() };
    let path = "/api/order/1012/message";
    let err = get_request("", path, configure(store.clone(), auth.clone())).await.expect_err("Expected error");
    assert_eq!(err, "Invalid or missing shared secret.");
    let (status, _) = get_request("s3cret", path, configure(store.clone(), auth.clone())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    // Liveness checks stay open
    let (status, _) = get_request("", "/health", configure(store, auth)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

fn configure(store: MemoryDocumentStore, auth: AuthConfig) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderQueryApi::new(store)));
        configure_routes::<MemoryDocumentStore, RecordingChannel, RecordingStatusUpdater>(cfg, &auth);
    }
}

async fn seeded_store() -> MemoryDocumentStore {
    let store = MemoryDocumentStore::new();
    let config = IngestConfig { delivery: DeliveryConfig::new("573000000001", None, true), ..Default::default() };
    let api = IngestApi::new(store.clone(), RecordingChannel::new(), RecordingStatusUpdater::new(), config);
    let orders = [
        json!({"id": 10, "number": "1010", "status": "processing", "total": "100.000",
            "date_created": "2024-04-30T23:59:59", "line_items": [{"name": "Tubo PVC", "quantity": 5}]}),
        json!({"id": 11, "number": "1011", "status": "completed", "total": "50000",
            "date_created": "2024-05-01T00:00:00",
            "line_items": [{"name": "Tubo PVC", "quantity": 2}, {"name": "Codo", "quantity": 4}]}),
        json!({"id": 12, "number": "1012", "status": "processing", "total": 25000.5,
            "date_created": "2024-05-02T13:30:00", "line_items": [{"name": "Codo", "quantity": 1}]}),
        json!({"id": 13, "number": "1013", "status": "completed", "total": "12.500,00",
            "date_created": "2024-05-03T00:00:01", "line_items": [{"name": "Válvula", "quantity": 9}]}),
    ];
    let now = Utc.with_ymd_and_hms(2024, 5, 4, 8, 0, 0).unwrap();
    for order in orders {
        api.ingest_order_event_at(order, now).await.unwrap();
    }
    assert_eq!(store.len("orders").await, 4);
    store
}
