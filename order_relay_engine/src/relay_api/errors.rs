use thiserror::Error;

use crate::traits::{ChannelError, DocumentStoreError, StatusUpdateError};

#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Notification channel error: {0}")]
    ChannelUnavailable(#[from] ChannelError),
    #[error("Order status update failed: {0}")]
    UpstreamStatusUpdateFailed(#[from] StatusUpdateError),
    #[error("Document store error: {0}")]
    StoreUnavailable(#[from] DocumentStoreError),
}
