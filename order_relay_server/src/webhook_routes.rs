use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use order_relay_engine::{
    traits::{DocumentStore, NotificationChannel, OrderStatusUpdater},
    IngestApi,
};
use serde_json::Value;

use crate::{data_objects::JsonResponse, errors::ServerError, route};

route!(woocommerce_webhook => Post "/woocommerce" impl DocumentStore, NotificationChannel, OrderStatusUpdater);
/// Receives WooCommerce order webhooks.
///
/// The body is read raw: when a webhook is first saved, WooCommerce sends a form-encoded `webhook_id=..` ping that
/// must be acknowledged with a 2xx for the webhook to stay active. Anything that is not a JSON object is treated as
/// such a ping. Order payloads go through the ingest pipeline. Only a persistence failure produces an error status,
/// which makes WooCommerce retry the delivery.
pub async fn woocommerce_webhook<S, C, U>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<IngestApi<S, C, U>>,
) -> Result<HttpResponse, ServerError>
where
    S: DocumentStore,
    C: NotificationChannel,
    U: OrderStatusUpdater,
{
    trace!("📦️ Received webhook request: {}", req.uri());
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(v) if v.is_object() => v,
        _ => {
            let topic = req.headers().get("X-WC-Webhook-Topic").and_then(|v| v.to_str().ok()).unwrap_or("none");
            info!("📦️ Webhook body is not an order (topic: {topic}, {} bytes). Acknowledging ping.", body.len());
            return Ok(HttpResponse::Ok().json(JsonResponse::success("Ping received.")));
        },
    };
    let result = api.ingest_order_event(payload).await?;
    Ok(HttpResponse::Ok().json(result))
}
