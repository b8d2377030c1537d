use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::delivery::DeliveryReport;

pub const ORDERS_COLLECTION: &str = "orders";
pub const ORDER_SOURCE: &str = "woocommerce";

//--------------------------------------     OrderRecord       ---------------------------------------------------------
/// The canonical order, extracted from an arbitrarily shaped upstream payload.
///
/// Every field has a well-defined default, so a record can be built from any JSON value. See
/// [`crate::normalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// The upstream order id. `0` means "unknown".
    pub order_id: i64,
    pub order_number: String,
    pub status: String,
    pub currency: String,
    pub total: f64,
    pub customer: CustomerInfo,
    pub address: DeliveryAddress,
    pub line_items: Vec<LineItem>,
    pub has_shipping_lines: bool,
    pub payment_method: String,
    pub created_at: NaiveDateTime,
    pub extracted_note: String,
    pub extracted_tax_id: String,
}

impl OrderRecord {
    /// The id the record is stored under. Orders without an upstream id get a fresh random id, so they can never be
    /// deduplicated against each other.
    pub fn document_id(&self) -> String {
        if self.order_id == 0 {
            format!("{:016x}", rand::random::<u64>())
        } else {
            self.order_id.to_string()
        }
    }
}

impl Display for OrderRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order #{} (id {}) [{}] {} {:.2} for {}",
            self.order_number, self.order_id, self.status, self.currency, self.total, self.customer.name
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// The billing block, passed through untouched.
    pub billing: Value,
    /// The shipping block, passed through untouched.
    pub shipping: Value,
}

/// Where the order goes. Each field prefers the shipping block and falls back to billing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub sku: String,
    pub product_id: i64,
    pub quantity: f64,
    pub price: f64,
    pub subtotal: f64,
    pub total: f64,
}

impl LineItem {
    /// The label printed in notifications: the SKU, or the product name when there is no SKU.
    pub fn label(&self) -> &str {
        if self.sku.trim().is_empty() {
            self.name.as_str()
        } else {
            self.sku.as_str()
        }
    }
}

//--------------------------------------     DedupState       ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupState {
    /// Hex-encoded SHA-256 of the last formatted message.
    pub content_hash: String,
    pub last_sent_at: DateTime<Utc>,
}

//--------------------------------------     StoredOrder       ---------------------------------------------------------
/// The document persisted for every order. Redeliveries overwrite it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredOrder {
    #[serde(flatten)]
    pub record: OrderRecord,
    /// The inbound payload, verbatim.
    pub raw: Value,
    pub message_text: String,
    pub source: String,
    pub ingested_at: DateTime<Utc>,
    #[serde(default)]
    pub dedup: Option<DedupState>,
    /// The most recent delivery that actually went out.
    #[serde(default)]
    pub delivery: Option<DeliveryReport>,
    #[serde(default)]
    pub status_updated: bool,
}

impl StoredOrder {
    /// Reads the dedup state out of a stored document without requiring the rest of the document to be well-formed.
    pub fn dedup_state_of(document: &Value) -> Option<DedupState> {
        serde_json::from_value(document.get("dedup")?.clone()).ok()
    }

    pub fn delivery_of(document: &Value) -> Option<DeliveryReport> {
        serde_json::from_value(document.get("delivery")?.clone()).ok()
    }
}

//--------------------------------------     OrderMessage       --------------------------------------------------------
/// The formatted notification text for an order, as served to operators for copy/paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMessage {
    pub order_number: String,
    pub text: String,
}

impl OrderMessage {
    pub fn from_document(document: &Value) -> Self {
        let order_number = match &document["order_number"] {
            Value::String(s) => s.clone(),
            Value::Null => String::default(),
            v => v.to_string(),
        };
        let text = document["message_text"].as_str().unwrap_or_default().to_string();
        Self { order_number, text }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_ids() {
        let mut record = crate::normalizer::normalize(&json!({"id": 77}), Utc::now().naive_utc());
        assert_eq!(record.document_id(), "77");
        record.order_id = 0;
        let a = record.document_id();
        let b = record.document_id();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn line_item_label_prefers_sku() {
        let mut item = LineItem { name: "Válvula 1/2".into(), sku: "VAL-12".into(), ..Default::default() };
        assert_eq!(item.label(), "VAL-12");
        item.sku = " ".into();
        assert_eq!(item.label(), "Válvula 1/2");
    }

    #[test]
    fn order_message_from_document() {
        let doc = json!({"order_number": "501", "message_text": "Pedido 501"});
        assert_eq!(OrderMessage::from_document(&doc), OrderMessage {
            order_number: "501".into(),
            text: "Pedido 501".into()
        });
        let doc = json!({"order_number": 12});
        assert_eq!(OrderMessage::from_document(&doc).order_number, "12");
        assert_eq!(OrderMessage::from_document(&doc).text, "");
    }

    #[test]
    fn dedup_state_from_partial_document() {
        let doc = json!({"dedup": {"content_hash": "abc", "last_sent_at": "2024-05-01T10:00:00Z"}});
        let state = StoredOrder::dedup_state_of(&doc).unwrap();
        assert_eq!(state.content_hash, "abc");
        assert!(StoredOrder::dedup_state_of(&json!({"dedup": "garbage"})).is_none());
        assert!(StoredOrder::dedup_state_of(&json!({})).is_none());
    }
}
