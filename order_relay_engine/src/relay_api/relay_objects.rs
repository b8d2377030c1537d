use serde::{Deserialize, Serialize};

use crate::{db_types::OrderMessage, delivery::DeliveryReport};

/// The outcome of a single [`crate::IngestApi::ingest_order_event`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResult {
    pub ok: bool,
    /// The id of the stored order document.
    pub saved_doc: String,
    pub whatsapp_attempted: bool,
    pub whatsapp_sent: bool,
    pub status_updated: bool,
    pub dedup_skipped: bool,
    /// Present only when a delivery was made on this call.
    pub delivery: Option<DeliveryReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMessages {
    pub from: String,
    pub to: String,
    pub results: Vec<OrderMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    pub name: String,
    pub qty: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub status: Option<String>,
    pub total_orders: usize,
    pub total_amount: f64,
    pub top_products: Vec<ProductSales>,
}
