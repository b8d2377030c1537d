use log::*;
use order_relay_engine::traits::{ChannelError, NotificationChannel, TemplateMessage};
use serde_json::Value;
use whatsapp_tools::{MessageResponse, WhatsAppApi, WhatsAppApiError, WhatsAppConfig};

/// Delivers notifications through the WhatsApp Cloud API.
#[derive(Clone)]
pub struct WhatsAppChannel {
    api: WhatsAppApi,
}

impl WhatsAppChannel {
    pub fn new(config: WhatsAppConfig) -> Result<Self, WhatsAppApiError> {
        let api = WhatsAppApi::new(config)?;
        if !api.is_configured() {
            warn!("💬️ The WhatsApp channel is not configured. Every notification will fail.");
        }
        Ok(Self { api })
    }
}

fn to_channel_error(e: WhatsAppApiError) -> ChannelError {
    match e {
        WhatsAppApiError::NotConfigured => ChannelError::NotConfigured(e.to_string()),
        WhatsAppApiError::QueryError { status, message } => ChannelError::Rejected { status, message },
        e => ChannelError::Unavailable(e.to_string()),
    }
}

fn to_value(response: MessageResponse) -> Value {
    serde_json::to_value(response).unwrap_or_default()
}

impl NotificationChannel for WhatsAppChannel {
    async fn send_text(&self, recipient: &str, body: &str) -> Result<Value, ChannelError> {
        self.api.send_text(recipient, body).await.map(to_value).map_err(to_channel_error)
    }

    async fn send_template(&self, recipient: &str, template: &TemplateMessage) -> Result<Value, ChannelError> {
        self.api
            .send_template(recipient, &template.name, &template.language, &template.parameters)
            .await
            .map(to_value)
            .map_err(to_channel_error)
    }
}
