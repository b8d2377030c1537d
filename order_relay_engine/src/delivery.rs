//! Best-effort fan-out of an order notification to every configured recipient.
//!
//! Delivery runs in up to two passes. The template pass (when a template is configured) sends a short structured
//! message to each recipient. The text pass (when enabled) then sends the full formatted summary to each recipient.
//! The text pass always runs, whatever happened during the template pass, and a failure for one recipient never stops
//! the others. Failures are logged and recorded in the [`DeliveryReport`]; [`DeliveryOrchestrator::deliver`] itself
//! cannot fail.

use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    db_types::OrderRecord,
    formatter::format_currency,
    traits::{ChannelError, NotificationChannel, TemplateMessage},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub name: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub recipients: Vec<String>,
    pub template: Option<TemplateSpec>,
    pub send_text: bool,
}

impl DeliveryConfig {
    /// Builds a configuration from a comma-separated recipient list. See [`normalize_recipients`].
    pub fn new(recipients: &str, template: Option<TemplateSpec>, send_text: bool) -> Self {
        Self { recipients: normalize_recipients(recipients), template, send_text }
    }
}

/// Splits a comma-separated list of phone numbers, strips whitespace and a leading `+`, drops empties and removes
/// duplicates, keeping the first occurrence.
pub fn normalize_recipients(raw: &str) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    raw.split(',')
        .map(|r| {
            let compact = r.chars().filter(|c| !c.is_whitespace()).collect::<String>();
            compact.strip_prefix('+').map(str::to_string).unwrap_or(compact)
        })
        .filter(|r| !r.is_empty())
        .for_each(|r| {
            if !result.contains(&r) {
                result.push(r);
            }
        });
    result
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientOutcome {
    pub recipient: String,
    pub response: Option<Value>,
    pub error: Option<String>,
}

impl RecipientOutcome {
    fn from_result(recipient: &str, result: Result<Value, ChannelError>) -> Self {
        match result {
            Ok(response) => Self { recipient: recipient.to_string(), response: Some(response), error: None },
            Err(e) => Self { recipient: recipient.to_string(), response: None, error: Some(e.to_string()) },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// True when there was at least one recipient to send to.
    pub attempted: bool,
    pub template: Vec<RecipientOutcome>,
    pub text: Vec<RecipientOutcome>,
}

impl DeliveryReport {
    /// True when at least one message, of either kind, went out.
    pub fn delivered(&self) -> bool {
        self.template.iter().chain(self.text.iter()).any(RecipientOutcome::is_success)
    }

    pub fn failures(&self) -> usize {
        self.template.iter().chain(self.text.iter()).filter(|o| !o.is_success()).count()
    }
}

pub struct DeliveryOrchestrator<C> {
    channel: C,
    config: DeliveryConfig,
}

impl<C> DeliveryOrchestrator<C> {
    pub fn new(channel: C, config: DeliveryConfig) -> Self {
        Self { channel, config }
    }
}

impl<C> DeliveryOrchestrator<C>
where C: NotificationChannel
{
    pub async fn deliver(&self, record: &OrderRecord, text: &str) -> DeliveryReport {
        let recipients = &self.config.recipients;
        let mut report = DeliveryReport { attempted: !recipients.is_empty(), ..Default::default() };
        if !report.attempted {
            warn!("💬️ No notification recipients are configured. Order #{} will not be sent.", record.order_number);
            return report;
        }
        if let Some(spec) = &self.config.template {
            let message = TemplateMessage {
                name: spec.name.clone(),
                language: spec.language.clone(),
                parameters: vec![
                    record.order_number.clone(),
                    record.customer.name.clone(),
                    format_currency(record.total),
                ],
            };
            for recipient in recipients {
                let result = self.channel.send_template(recipient, &message).await;
                log_outcome("template", &record.order_number, recipient, &result);
                report.template.push(RecipientOutcome::from_result(recipient, result));
            }
        }
        if self.config.send_text {
            for recipient in recipients {
                let result = self.channel.send_text(recipient, text).await;
                log_outcome("text", &record.order_number, recipient, &result);
                report.text.push(RecipientOutcome::from_result(recipient, result));
            }
        }
        debug!(
            "💬️ Delivery for order #{} complete. {} template and {} text messages attempted, {} failed.",
            record.order_number,
            report.template.len(),
            report.text.len(),
            report.failures()
        );
        report
    }
}

fn log_outcome(kind: &str, order_number: &str, recipient: &str, result: &Result<Value, ChannelError>) {
    match result {
        Ok(_) => info!("💬️ Sent {kind} message for order #{order_number} to {recipient}"),
        Err(e) => warn!("💬️ Could not send {kind} message for order #{order_number} to {recipient}. {e}"),
    }
}
