use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use order_relay_engine::{
    traits::{DocumentStore, NotificationChannel, OrderStatusUpdater},
    IngestApi,
    MemoryDocumentStore,
    OrderQueryApi,
    SqliteDocumentStore,
};

use crate::{
    config::{AuthConfig, ServerConfig, MEMORY_DATABASE},
    errors::ServerError,
    integrations::{whatsapp::WhatsAppChannel, woocommerce::WooStatusUpdater},
    middleware::{HmacMiddlewareFactory, SharedSecretMiddlewareFactory, SHARED_SECRET_HEADER, WOO_SIGNATURE_HEADER},
    routes::{health, root, OrderMessageRoute, OrderMessagesRoute, SalesReportRoute},
    webhook_routes::WoocommerceWebhookRoute,
};

/// WooCommerce payloads carry the full order, including line item metadata. 1 MiB is plenty.
const MAX_PAYLOAD_SIZE: usize = 1 << 20;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let channel =
        WhatsAppChannel::new(config.whatsapp.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let updater = WooStatusUpdater::new(config.woo.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = if config.database_url.trim() == MEMORY_DATABASE {
        warn!("🚀️ Using the in-memory document store. Orders will be lost when the server stops.");
        create_server_instance(config, MemoryDocumentStore::new(), channel, updater)?
    } else {
        let store = SqliteDocumentStore::new_with_url(&config.database_url, 25)
            .await
            .map_err(|e| ServerError::InitializeError(e.to_string()))?;
        info!("🚀️ Orders are stored in {}", store.url());
        create_server_instance(config, store, channel, updater)?
    };
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<S, C, U>(
    config: ServerConfig,
    store: S,
    channel: C,
    updater: U,
) -> Result<Server, ServerError>
where
    S: DocumentStore + Send + 'static,
    C: NotificationChannel + Clone + Send + 'static,
    U: OrderStatusUpdater + Clone + Send + 'static,
{
    let ingest_config = config.ingest_config();
    let auth = config.auth.clone();
    let srv = HttpServer::new(move || {
        let ingest_api = IngestApi::new(store.clone(), channel.clone(), updater.clone(), ingest_config.clone());
        let query_api = OrderQueryApi::new(store.clone());
        let auth = auth.clone();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("relay::access_log"))
            .app_data(web::Data::new(ingest_api))
            .app_data(web::Data::new(query_api))
            .configure(move |cfg| configure_routes::<S, C, U>(cfg, &auth))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route. `/webhook` and `/api` are guarded by the shared secret; webhooks are additionally checked
/// for a valid WooCommerce signature when a webhook secret is configured.
///
/// The handlers expect an `IngestApi<S, C, U>` and an `OrderQueryApi<S>` in the app data.
pub fn configure_routes<S, C, U>(cfg: &mut web::ServiceConfig, auth: &AuthConfig)
where
    S: DocumentStore + 'static,
    C: NotificationChannel + 'static,
    U: OrderStatusUpdater + 'static,
{
    let hmac_enabled = !auth.woo_webhook_secret.is_empty();
    let webhook_scope = web::scope("/webhook")
        .wrap(HmacMiddlewareFactory::new(WOO_SIGNATURE_HEADER, auth.woo_webhook_secret.clone(), hmac_enabled))
        .wrap(SharedSecretMiddlewareFactory::new(SHARED_SECRET_HEADER, auth.shared_secret.clone()))
        .service(WoocommerceWebhookRoute::<S, C, U>::new());
    let api_scope = web::scope("/api")
        .wrap(SharedSecretMiddlewareFactory::new(SHARED_SECRET_HEADER, auth.shared_secret.clone()))
        .service(OrderMessageRoute::<S>::new())
        .service(OrderMessagesRoute::<S>::new())
        .service(SalesReportRoute::<S>::new());
    cfg.app_data(web::PayloadConfig::new(MAX_PAYLOAD_SIZE))
        .service(root)
        .service(health)
        .service(webhook_scope)
        .service(api_scope);
}
