use std::{env, time::Duration};

use log::*;
use order_relay_engine::{
    delivery::{DeliveryConfig, TemplateSpec},
    IngestConfig,
};
use relay_common::{env_flag, env_or_default, Secret};
use whatsapp_tools::WhatsAppConfig;
use woo_tools::WooConfig;

const DEFAULT_RELAY_HOST: &str = "127.0.0.1";
const DEFAULT_RELAY_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/order_relay.db";
const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(900);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_TEMPLATE_NAME: &str = "pedido_resumen";
const DEFAULT_TEMPLATE_LANGUAGE: &str = "es";
const DEFAULT_TARGET_STATUS: &str = "on-hold";
/// `RELAY_DATABASE_URL` value that selects the volatile in-memory store.
pub const MEMORY_DATABASE: &str = "memory";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// A sqlx SQLite url, or `memory`.
    pub database_url: String,
    pub auth: AuthConfig,
    /// Identical notifications for the same order are suppressed for this long.
    pub dedup_window: Duration,
    /// Applies to every outbound HTTP call (WhatsApp and WooCommerce).
    pub http_timeout: Duration,
    pub whatsapp: WhatsAppConfig,
    pub notifications: NotificationConfig,
    pub woo: WooConfig,
    /// The status to move an order to after its notification goes out. `None` disables status updates.
    pub target_status: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// When not empty, `/webhook` and `/api` calls must carry this value in the `X-Relay-Secret` header.
    pub shared_secret: Secret<String>,
    /// When not empty, webhook bodies must be signed with this key (`X-WC-Webhook-Signature`).
    pub woo_webhook_secret: Secret<String>,
}

#[derive(Clone, Debug)]
pub struct NotificationConfig {
    /// Comma-separated recipient phone numbers.
    pub recipients: String,
    pub template_name: String,
    pub template_language: String,
    pub send_template: bool,
    pub send_formatted: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            recipients: String::default(),
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
            template_language: DEFAULT_TEMPLATE_LANGUAGE.to_string(),
            send_template: true,
            send_formatted: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RELAY_HOST.to_string(),
            port: DEFAULT_RELAY_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            dedup_window: DEFAULT_DEDUP_WINDOW,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            whatsapp: WhatsAppConfig::default(),
            notifications: NotificationConfig::default(),
            woo: WooConfig::default(),
            target_status: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RELAY_HOST").ok().unwrap_or_else(|| DEFAULT_RELAY_HOST.into());
        let port = env::var("RELAY_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RELAY_PORT. {e} Using the default, {DEFAULT_RELAY_PORT}, \
                         instead."
                    );
                    DEFAULT_RELAY_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RELAY_PORT);
        let database_url = env_or_default("RELAY_DATABASE_URL", DEFAULT_DATABASE_URL);
        let auth = AuthConfig::from_env();
        let dedup_window = duration_from_env("RELAY_DEDUP_WINDOW_SECS", DEFAULT_DEDUP_WINDOW);
        let http_timeout = duration_from_env("RELAY_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT);
        let whatsapp = WhatsAppConfig::new_from_env_or_default().with_timeout(http_timeout);
        let notifications = NotificationConfig::from_env_or_default();
        let woo = WooConfig::new_from_env_or_default().with_timeout(http_timeout);
        let target_status = env_flag("RELAY_WOO_UPDATE_ON_HOLD", false)
            .then(|| env_or_default("RELAY_WOO_TARGET_STATUS", DEFAULT_TARGET_STATUS));
        if target_status.is_some() && !woo.is_configured() {
            warn!(
                "🪛️ RELAY_WOO_UPDATE_ON_HOLD is enabled, but the WooCommerce API is not configured. Status updates will \
                 fail until RELAY_WOO_BASE_URL, RELAY_WOO_CONSUMER_KEY and RELAY_WOO_CONSUMER_SECRET are set."
            );
        }
        Self {
            host,
            port,
            database_url,
            auth,
            dedup_window,
            http_timeout,
            whatsapp,
            notifications,
            woo,
            target_status,
        }
    }

    /// The pipeline configuration derived from the server settings.
    pub fn ingest_config(&self) -> IngestConfig {
        let n = &self.notifications;
        let template = n
            .send_template
            .then(|| TemplateSpec { name: n.template_name.clone(), language: n.template_language.clone() });
        IngestConfig {
            delivery: DeliveryConfig::new(&n.recipients, template, n.send_formatted),
            dedup_window: self.dedup_window,
            target_status: self.target_status.clone(),
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let shared_secret = Secret::new(env::var("RELAY_WEBHOOK_SECRET").unwrap_or_default());
        if shared_secret.is_empty() {
            warn!(
                "🪛️ RELAY_WEBHOOK_SECRET is not set. The webhook and API endpoints are open to anyone who can reach \
                 this server."
            );
        }
        let woo_webhook_secret = Secret::new(env::var("RELAY_WOO_WEBHOOK_SECRET").unwrap_or_default());
        if woo_webhook_secret.is_empty() {
            info!("🪛️ RELAY_WOO_WEBHOOK_SECRET is not set. Webhook signatures will not be checked.");
        }
        Self { shared_secret, woo_webhook_secret }
    }
}

impl NotificationConfig {
    pub fn from_env_or_default() -> Self {
        let recipients = env::var("RELAY_WHATSAPP_NOTIFY_TO").unwrap_or_else(|_| {
            warn!("🪛️ RELAY_WHATSAPP_NOTIFY_TO is not set. Nobody will be notified of new orders.");
            String::default()
        });
        let template_name = env_or_default("RELAY_WA_TEMPLATE_NAME", DEFAULT_TEMPLATE_NAME);
        let template_language = env_or_default("RELAY_WA_TEMPLATE_LANG", DEFAULT_TEMPLATE_LANGUAGE);
        let send_template = env_flag("RELAY_WA_SEND_TEMPLATE", true);
        let send_formatted = env_flag("RELAY_WA_SEND_FORMATTED", true);
        if !send_template && !send_formatted {
            warn!("🪛️ Both template and formatted messages are disabled. No notifications will be sent.");
        }
        Self { recipients, template_name, template_language, send_template, send_formatted }
    }
}

fn duration_from_env(name: &str, default: Duration) -> Duration {
    match env::var(name) {
        Ok(s) => s.trim().parse::<u64>().map(Duration::from_secs).unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid number of seconds for {name}. {e} Using the default, {default:?}, instead.");
            default
        }),
        Err(_) => default,
    }
}
