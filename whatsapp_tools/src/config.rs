use std::time::Duration;

use log::*;
use relay_common::{env_or_default, Secret};

pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v20.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Base URL of the Graph API. Only overridden in tests.
    pub graph_url: String,
    pub api_version: String,
    /// The id of the sending business phone number (not the phone number itself).
    pub phone_number_id: String,
    pub access_token: Secret<String>,
    pub timeout: Duration,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            phone_number_id: String::default(),
            access_token: Secret::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl WhatsAppConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_version = env_or_default("RELAY_WHATSAPP_API_VERSION", DEFAULT_API_VERSION);
        let phone_number_id = std::env::var("RELAY_WHATSAPP_PHONE_ID").unwrap_or_else(|_| {
            warn!("💬️ RELAY_WHATSAPP_PHONE_ID not set. WhatsApp notifications will not be delivered.");
            String::default()
        });
        let access_token = Secret::new(std::env::var("RELAY_WHATSAPP_TOKEN").unwrap_or_else(|_| {
            warn!("💬️ RELAY_WHATSAPP_TOKEN not set. WhatsApp notifications will not be delivered.");
            String::default()
        }));
        Self { api_version, phone_number_id, access_token, ..Default::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.phone_number_id.trim().is_empty() && !self.access_token.is_empty()
    }
}
