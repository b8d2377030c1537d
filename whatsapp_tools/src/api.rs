use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};

use crate::{
    config::WhatsAppConfig,
    data_objects::{MessageResponse, OutboundMessage},
    helpers::{truncate_body, MAX_TEXT_BODY_LENGTH},
    WhatsAppApiError,
};

#[derive(Clone)]
pub struct WhatsAppApi {
    config: WhatsAppConfig,
    client: Arc<Client>,
}

impl WhatsAppApi {
    pub fn new(config: WhatsAppConfig) -> Result<Self, WhatsAppApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let mut val = HeaderValue::from_str(&format!("Bearer {}", config.access_token.reveal()))
            .map_err(|e| WhatsAppApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| WhatsAppApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn url(&self) -> String {
        format!("{}/{}/{}/messages", self.config.graph_url, self.config.api_version, self.config.phone_number_id)
    }

    pub async fn post_message(&self, message: &OutboundMessage) -> Result<MessageResponse, WhatsAppApiError> {
        if !self.is_configured() {
            return Err(WhatsAppApiError::NotConfigured);
        }
        let url = self.url();
        trace!("💬️ Posting message to {url}");
        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(|e| WhatsAppApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("💬️ Message accepted. {status}");
            response.json::<MessageResponse>().await.map_err(|e| WhatsAppApiError::JsonError(e.to_string()))
        } else {
            let body = response.text().await.map_err(|e| WhatsAppApiError::RestRequestError(e.to_string()))?;
            warn!("💬️ WhatsApp rejected the message to {}. {status}: {}", message.to, shorten(&body));
            Err(WhatsAppApiError::QueryError { status: status.as_u16(), message: body })
        }
    }

    /// Sends a free-text message. Bodies longer than the API limit are truncated.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<MessageResponse, WhatsAppApiError> {
        let body = truncate_body(body, MAX_TEXT_BODY_LENGTH);
        debug!("💬️ Sending text message ({} chars) to {to}", body.chars().count());
        let message = OutboundMessage::text(to, body);
        let result = self.post_message(&message).await?;
        info!("💬️ Text message sent to {to}. Message id: {}", result.message_id().unwrap_or("n/a"));
        Ok(result)
    }

    /// Sends a template message with the given positional body parameters.
    pub async fn send_template(
        &self,
        to: &str,
        name: &str,
        language: &str,
        params: &[String],
    ) -> Result<MessageResponse, WhatsAppApiError> {
        debug!("💬️ Sending template '{name}' ({language}) to {to}");
        let message = OutboundMessage::template(to, name, language, params);
        let result = self.post_message(&message).await?;
        info!("💬️ Template '{name}' sent to {to}. Message id: {}", result.message_id().unwrap_or("n/a"));
        Ok(result)
    }
}

// Error bodies end up in the logs
fn shorten(body: &str) -> &str {
    truncate_body(body, 400)
}
