use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("The notification channel is not configured: {0}")]
    NotConfigured(String),
    #[error("The notification channel could not be reached: {0}")]
    Unavailable(String),
    #[error("The notification channel rejected the message. Status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// A pre-approved structured message with positional body parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMessage {
    pub name: String,
    pub language: String,
    pub parameters: Vec<String>,
}

/// A best-effort outbound messaging channel. The returned value is the provider's response, kept for diagnostics.
#[allow(async_fn_in_trait)]
pub trait NotificationChannel {
    async fn send_text(&self, recipient: &str, body: &str) -> Result<Value, ChannelError>;

    async fn send_template(&self, recipient: &str, template: &TemplateMessage) -> Result<Value, ChannelError>;
}
