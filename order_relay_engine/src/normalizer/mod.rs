//! Payload normalization.
//!
//! Upstream order payloads are loosely typed: amounts arrive as numbers or as locale-formatted strings, ids may be
//! strings, and customer details are scattered across the billing block, the shipping block and free-form meta data.
//! [`normalize`] folds all of that into an [`OrderRecord`]. It is total: any JSON value, including a non-object,
//! produces a record, with defaults standing in for whatever is missing.

mod coercion;
mod extraction;
mod timestamps;

use chrono::NaiveDateTime;
pub use coercion::{parse_amount, parse_amount_str, parse_id};
pub use extraction::{extract_note, extract_tax_id};
use log::trace;
use serde_json::{json, Value};
pub use timestamps::{parse_timestamp, truncate_to_seconds};

use crate::db_types::{CustomerInfo, DeliveryAddress, LineItem, OrderRecord};
use coercion::{first_text, text_field, text_of};

pub const DEFAULT_STATUS: &str = "pending";
pub const DEFAULT_CURRENCY: &str = "COP";
pub const UNKNOWN: &str = "N/A";

/// Builds the canonical [`OrderRecord`] for `raw`. `now` stands in for the creation time when the payload has no
/// usable timestamp.
pub fn normalize(raw: &Value, now: NaiveDateTime) -> OrderRecord {
    let empty = json!({});
    let billing = block(raw, "billing", &empty);
    let shipping = block(raw, "shipping", &empty);

    let order_id = match parse_id(&raw["id"]) {
        0 => parse_id(&raw["order_id"]),
        id => id,
    };
    let order_number = match text_field(raw, "number") {
        n if !n.is_empty() => n,
        _ if order_id != 0 => order_id.to_string(),
        _ => UNKNOWN.to_string(),
    };
    let created_at = ["date_created", "date_created_gmt"]
        .iter()
        .find_map(|k| raw[*k].as_str().and_then(|s| parse_timestamp(s, false)))
        .unwrap_or(now);

    let record = OrderRecord {
        order_id,
        order_number,
        status: non_empty_or(text_field(raw, "status"), DEFAULT_STATUS),
        currency: non_empty_or(text_field(raw, "currency"), DEFAULT_CURRENCY),
        total: parse_amount(&raw["total"]),
        customer: customer_info(billing, shipping),
        address: delivery_address(billing, shipping),
        line_items: line_items(&raw["line_items"]),
        has_shipping_lines: raw["shipping_lines"].as_array().map(|a| !a.is_empty()).unwrap_or(false),
        payment_method: first_text(raw, &["payment_method_title", "payment_method"]),
        created_at: truncate_to_seconds(created_at),
        extracted_note: extract_note(raw),
        extracted_tax_id: extract_tax_id(raw),
    };
    trace!("📦️ Normalized {record}");
    record
}

fn block<'a>(raw: &'a Value, key: &str, empty: &'a Value) -> &'a Value {
    raw.get(key).filter(|v| v.is_object()).unwrap_or(empty)
}

fn non_empty_or(s: String, default: &str) -> String {
    if s.is_empty() {
        default.to_string()
    } else {
        s
    }
}

fn customer_info(billing: &Value, shipping: &Value) -> CustomerInfo {
    let full_name = format!("{} {}", text_field(billing, "first_name"), text_field(billing, "last_name"));
    let name = match full_name.trim() {
        "" => non_empty_or(text_field(billing, "company"), UNKNOWN),
        n => n.to_string(),
    };
    CustomerInfo {
        name,
        phone: text_field(billing, "phone"),
        email: text_field(billing, "email"),
        billing: billing.clone(),
        shipping: shipping.clone(),
    }
}

fn delivery_address(billing: &Value, shipping: &Value) -> DeliveryAddress {
    let resolve = |key: &str| non_empty_or(text_field(shipping, key), &text_field(billing, key));
    DeliveryAddress {
        address_1: resolve("address_1"),
        address_2: resolve("address_2"),
        city: resolve("city"),
        state: resolve("state"),
    }
}

fn line_items(items: &Value) -> Vec<LineItem> {
    let Some(items) = items.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| LineItem {
            name: text_of(&item["name"]),
            sku: text_of(&item["sku"]),
            product_id: parse_id(&item["product_id"]),
            quantity: parse_amount(&item["quantity"]),
            price: parse_amount(&item["price"]),
            subtotal: parse_amount(&item["subtotal"]),
            total: parse_amount(&item["total"]),
        })
        .collect()
}
