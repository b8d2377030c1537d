//! # WhatsApp tools
//!
//! A small client for the [WhatsApp Cloud API](https://developers.facebook.com/docs/whatsapp/cloud-api) messages
//! endpoint. Only the two message kinds needed for order notifications are supported:
//! * free-text messages, which can only be delivered inside an open 24h customer-service window, and
//! * template messages, pre-approved layouts with positional body parameters that can open such a window.
mod api;
mod config;
mod data_objects;
mod error;
mod helpers;

pub use api::WhatsAppApi;
pub use config::WhatsAppConfig;
pub use data_objects::{
    Language,
    MessageContent,
    MessageResponse,
    OutboundMessage,
    SentMessage,
    TemplateBody,
    TemplateComponent,
    TemplateParameter,
    TextBody,
    WhatsAppContact,
};
pub use error::WhatsAppApiError;
pub use helpers::{truncate_body, MAX_TEXT_BODY_LENGTH};
