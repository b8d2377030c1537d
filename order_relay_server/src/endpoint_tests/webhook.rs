use actix_web::{http::StatusCode, web, web::ServiceConfig};
use order_relay_engine::{
    delivery::DeliveryConfig,
    relay_objects::IngestResult,
    test_utils::fakes::{RecordingChannel, RecordingStatusUpdater},
    traits::{ChannelError, DocumentStore, DocumentStoreError, StatusUpdateError},
    IngestApi,
    IngestConfig,
    MemoryDocumentStore,
};
use relay_common::Secret;
use serde_json::json;

use super::{
    helpers::post_request,
    mocks::{MockChannel, MockStatusUpdater, MockStore},
};
use crate::{config::AuthConfig, helpers::calculate_hmac, middleware::SHARED_SECRET_HEADER, server::configure_routes};

const WEBHOOK: &str = "/webhook/woocommerce";
const OPERATOR: &str = "573001112233";
const JSON: (&str, &str) = ("Content-Type", "application/json");

#[actix_web::test]
async fn ping_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let rig = Rig::new();
    let headers = [("Content-Type", "application/x-www-form-urlencoded")];
    let (status, body) =
        post_request(&headers, WEBHOOK, b"webhook_id=17", rig.configure(AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Ping received."}"#);
    // A JSON body that is not an object is a ping too
    let (status, _) = post_request(&[JSON], WEBHOOK, b"[1,2,3]", rig.configure(AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(rig.channel.sent().is_empty());
    assert_eq!(rig.store.len("orders").await, 0);
}

#[actix_web::test]
async fn order_is_relayed() {
    let _ = env_logger::try_init().ok();
    let rig = Rig::new();
    let (status, body) =
        post_request(&[JSON], WEBHOOK, &order_body(), rig.configure(AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result = serde_json::from_str::<IngestResult>(&body).unwrap();
    assert!(result.ok);
    assert_eq!(result.saved_doc, "501");
    assert!(result.whatsapp_attempted);
    assert!(result.whatsapp_sent);
    assert!(result.status_updated);
    assert!(!result.dedup_skipped);

    let texts = rig.channel.texts();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].0, OPERATOR);
    assert!(texts[0].1.starts_with("Pedido 501"));
    assert_eq!(rig.updater.calls(), vec![(501, "on-hold".to_string())]);
    let stored = rig.store.get("orders", "501").await.unwrap().unwrap();
    assert_eq!(stored["source"], json!("woocommerce"));
}

#[actix_web::test]
async fn repeated_order_is_not_resent() {
    let _ = env_logger::try_init().ok();
    let rig = Rig::new();
    post_request(&[JSON], WEBHOOK, &order_body(), rig.configure(AuthConfig::default())).await.unwrap();
    let (status, body) =
        post_request(&[JSON], WEBHOOK, &order_body(), rig.configure(AuthConfig::default())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result = serde_json::from_str::<IngestResult>(&body).unwrap();
    assert!(result.dedup_skipped);
    assert!(!result.whatsapp_attempted);
    assert_eq!(rig.channel.texts().len(), 1);
    assert_eq!(rig.updater.calls().len(), 1);
}

#[actix_web::test]
async fn shared_secret_is_required() {
    let _ = env_logger::try_init().ok();
    let rig = Rig::new();
    let auth = AuthConfig { shared_secret: Secret::new("s3cret".into()), ..Default::default() };
    let err =
        post_request(&[JSON], WEBHOOK, &order_body(), rig.configure(auth.clone())).await.expect_err("Expected error");
    assert_eq!(err, "Invalid or missing shared secret.");

    let headers = [JSON, (SHARED_SECRET_HEADER, "wrong")];
    let err =
        post_request(&headers, WEBHOOK, &order_body(), rig.configure(auth.clone())).await.expect_err("Expected error");
    assert_eq!(err, "Invalid or missing shared secret.");

    // Differs only in the last character
    let headers = [JSON, (SHARED_SECRET_HEADER, "s3cres")];
    let err =
        post_request(&headers, WEBHOOK, &order_body(), rig.configure(auth.clone())).await.expect_err("Expected error");
    assert_eq!(err, "Invalid or missing shared secret.");
    assert!(rig.channel.sent().is_empty());

    let headers = [JSON, (SHARED_SECRET_HEADER, "s3cret")];
    let (status, _) = post_request(&headers, WEBHOOK, &order_body(), rig.configure(auth)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rig.channel.texts().len(), 1);
}

#[actix_web::test]
async fn webhook_signature_is_checked() {
    let _ = env_logger::try_init().ok();
    let rig = Rig::new();
    let auth = AuthConfig { woo_webhook_secret: Secret::new("woo-secret".into()), ..Default::default() };
    let body = order_body();

    let err = post_request(&[JSON], WEBHOOK, &body, rig.configure(auth.clone())).await.expect_err("Expected error");
    assert_eq!(err, "No webhook signature found.");

    let bad_sig = calculate_hmac("another-secret", &body);
    let headers = [JSON, ("X-WC-Webhook-Signature", bad_sig.as_str())];
    let err = post_request(&headers, WEBHOOK, &body, rig.configure(auth.clone())).await.expect_err("Expected error");
    assert_eq!(err, "Invalid webhook signature.");
    assert_eq!(rig.store.len("orders").await, 0);

    let sig = calculate_hmac("woo-secret", &body);
    let headers = [JSON, ("X-WC-Webhook-Signature", sig.as_str())];
    let (status, body) = post_request(&headers, WEBHOOK, &body, rig.configure(auth)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result = serde_json::from_str::<IngestResult>(&body).unwrap();
    assert!(result.whatsapp_sent);
}

#[actix_web::test]
async fn store_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let channel = RecordingChannel::new();
    let mut store = MockStore::new();
    store.expect_get().returning(|_, _| Ok(None));
    store.expect_put().returning(|_, _, _| Err(DocumentStoreError::ConnectionError("database is locked".into())));
    let api = IngestApi::new(store, channel.clone(), RecordingStatusUpdater::new(), ingest_config());
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(api));
        configure_routes::<MockStore, RecordingChannel, RecordingStatusUpdater>(cfg, &AuthConfig::default());
    };
    let (status, body) = post_request(&[JSON], WEBHOOK, &order_body(), configure).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with(r#"{"error":"#));
    assert!(body.contains("database is locked"));
    // The notification went out before the write failed
    assert_eq!(channel.texts().len(), 1);
}

#[actix_web::test]
async fn failed_notifications_are_not_fatal() {
    let _ = env_logger::try_init().ok();
    let store = MemoryDocumentStore::new();
    let mut channel = MockChannel::new();
    channel.expect_send_template().never();
    channel.expect_send_text().times(1).returning(|_, _| Err(ChannelError::Unavailable("connection reset".into())));
    let mut updater = MockStatusUpdater::new();
    updater
        .expect_update_order_status()
        .times(1)
        .returning(|order_id, _| Err(StatusUpdateError::Rejected { order_id, reason: "invalid status".into() }));
    let api = IngestApi::new(store.clone(), channel, updater, ingest_config());
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(api));
        configure_routes::<MemoryDocumentStore, MockChannel, MockStatusUpdater>(cfg, &AuthConfig::default());
    };
    let (status, body) = post_request(&[JSON], WEBHOOK, &order_body(), configure).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result = serde_json::from_str::<IngestResult>(&body).unwrap();
    assert!(result.ok);
    assert!(result.whatsapp_attempted);
    assert!(!result.whatsapp_sent);
    assert!(!result.status_updated);
    let report = result.delivery.unwrap();
    assert_eq!(report.failures(), 1);
    assert_eq!(report.text[0].recipient, OPERATOR);
    assert!(report.text[0].error.is_some());
    // The order is stored regardless
    let stored = store.get("orders", "501").await.unwrap().unwrap();
    assert_eq!(stored["status_updated"], json!(false));
}

struct Rig {
    store: MemoryDocumentStore,
    channel: RecordingChannel,
    updater: RecordingStatusUpdater,
}

impl Rig {
    fn new() -> Self {
        Self {
            store: MemoryDocumentStore::new(),
            channel: RecordingChannel::new(),
            updater: RecordingStatusUpdater::new(),
        }
    }

    fn configure(&self, auth: AuthConfig) -> impl FnOnce(&mut ServiceConfig) {
        let api = IngestApi::new(self.store.clone(), self.channel.clone(), self.updater.clone(), ingest_config());
        move |cfg| {
            cfg.app_data(web::Data::new(api));
            configure_routes::<MemoryDocumentStore, RecordingChannel, RecordingStatusUpdater>(cfg, &auth);
        }
    }
}

fn ingest_config() -> IngestConfig {
    IngestConfig {
        delivery: DeliveryConfig::new(OPERATOR, None, true),
        target_status: Some("on-hold".into()),
        ..Default::default()
    }
}

fn order_body() -> Vec<u8> {
    json!({
        "id": 501,
        "number": "501",
        "status": "processing",
        "currency": "COP",
        "total": "45001",
        "date_created": "2024-05-02T13:30:00",
        "billing": {"first_name": "Ana", "last_name": "Gómez", "phone": "3001234567"},
        "line_items": [{"name": "Tubo PVC", "quantity": 2, "total": "45001"}]
    })
    .to_string()
    .into_bytes()
}
