use std::time::Duration;

use log::*;
use relay_common::Secret;

#[derive(Debug, Clone)]
pub struct WooConfig {
    /// The REST root of the store, e.g. `https://my-shop.com/wp-json/wc/v3`
    pub base_url: String,
    pub consumer_key: Secret<String>,
    pub consumer_secret: Secret<String>,
    pub timeout: Duration,
}

impl Default for WooConfig {
    fn default() -> Self {
        Self {
            base_url: String::default(),
            consumer_key: Secret::default(),
            consumer_secret: Secret::default(),
            timeout: Duration::from_secs(20),
        }
    }
}

impl WooConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("RELAY_WOO_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| {
                info!("🧾️ RELAY_WOO_BASE_URL not set. WooCommerce order status updates are unavailable.");
                String::default()
            });
        let consumer_key = Secret::new(std::env::var("RELAY_WOO_CONSUMER_KEY").unwrap_or_default());
        let consumer_secret = Secret::new(std::env::var("RELAY_WOO_CONSUMER_SECRET").unwrap_or_default());
        Self { base_url, consumer_key, consumer_secret, ..Default::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.consumer_key.is_empty() && !self.consumer_secret.is_empty()
    }
}
