//! The collaborators the relay pipeline depends on.
//!
//! The pipeline never talks to a database or an HTTP API directly. Backends implement these traits and are handed to
//! [`crate::IngestApi`] and [`crate::OrderQueryApi`].
mod document_store;
mod notification_channel;
mod status_updater;

pub(crate) use document_store::validate_field;
pub use document_store::{DocumentQuery, DocumentStore, DocumentStoreError, RangeFilter};
pub use notification_channel::{ChannelError, NotificationChannel, TemplateMessage};
pub use status_updater::{OrderStatusUpdater, StatusUpdateError};
