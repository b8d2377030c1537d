use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StatusUpdateError {
    #[error("Order status updates are not configured")]
    NotConfigured,
    #[error("Could not reach the store to update order #{order_id}: {reason}")]
    Unavailable { order_id: i64, reason: String },
    #[error("The store rejected the status update for order #{order_id}: {reason}")]
    Rejected { order_id: i64, reason: String },
}

/// Mutates the status of an order on the originating store.
#[allow(async_fn_in_trait)]
pub trait OrderStatusUpdater {
    async fn update_order_status(&self, order_id: i64, status: &str) -> Result<(), StatusUpdateError>;
}
