use log::*;
use order_relay_engine::traits::{OrderStatusUpdater, StatusUpdateError};
use woo_tools::{WooApi, WooApiError, WooConfig};

/// Moves orders to a new status through the WooCommerce REST API.
#[derive(Clone)]
pub struct WooStatusUpdater {
    api: WooApi,
}

impl WooStatusUpdater {
    pub fn new(config: WooConfig) -> Result<Self, WooApiError> {
        let api = WooApi::new(config)?;
        Ok(Self { api })
    }
}

fn to_status_error(order_id: i64, e: WooApiError) -> StatusUpdateError {
    match e {
        WooApiError::NotConfigured => StatusUpdateError::NotConfigured,
        WooApiError::QueryError { status, message } => {
            StatusUpdateError::Rejected { order_id, reason: format!("{status}: {message}") }
        },
        e => StatusUpdateError::Unavailable { order_id, reason: e.to_string() },
    }
}

impl OrderStatusUpdater for WooStatusUpdater {
    async fn update_order_status(&self, order_id: i64, status: &str) -> Result<(), StatusUpdateError> {
        let order = self.api.update_order_status(order_id, status).await.map_err(|e| to_status_error(order_id, e))?;
        debug!("🧾️ WooCommerce reports order #{} ({}) as '{}'", order.number, order.id, order.status);
        Ok(())
    }
}
