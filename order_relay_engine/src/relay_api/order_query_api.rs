use std::{collections::HashMap, fmt::Debug};

use chrono::NaiveDateTime;
use log::*;
use serde_json::Value;

use crate::{
    db_types::{OrderMessage, ORDERS_COLLECTION},
    normalizer::{parse_amount, parse_timestamp},
    relay_api::{
        errors::RelayError,
        relay_objects::{OrderMessages, ProductSales, SalesSummary},
    },
    traits::{DocumentQuery, DocumentStore},
};

pub const DEFAULT_MESSAGE_LIMIT: usize = 10;
pub const MAX_MESSAGE_LIMIT: usize = 100;
pub const TOP_PRODUCTS: usize = 10;

/// Read-only access to stored orders: the notification texts (for copy/paste) and simple sales summaries.
pub struct OrderQueryApi<S> {
    store: S,
}

impl<S> Debug for OrderQueryApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderQueryApi")
    }
}

impl<S> OrderQueryApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> OrderQueryApi<S>
where S: DocumentStore
{
    /// Fetches the notification text for an order, by document id first and then by order number.
    pub async fn message_for_order(&self, order_number: &str) -> Result<Option<OrderMessage>, RelayError> {
        let by_id = self.store.get(ORDERS_COLLECTION, order_number).await?;
        let document = match by_id {
            Some(doc) => Some(doc),
            None => {
                let query =
                    DocumentQuery::new().with_equals("order_number", Value::from(order_number.to_string())).limit(1);
                self.store.query(ORDERS_COLLECTION, query).await?.into_iter().next()
            },
        };
        let message = document.map(|doc| OrderMessage {
            order_number: order_number.to_string(),
            ..OrderMessage::from_document(&doc)
        });
        Ok(message)
    }

    /// The notification texts for orders created between `from` and `to` (inclusive, dates or timestamps), oldest
    /// first. `limit` defaults to 10 and is clamped to 1..=100.
    pub async fn messages_in_range(
        &self,
        from: &str,
        to: &str,
        limit: Option<usize>,
    ) -> Result<OrderMessages, RelayError> {
        let (start, end) = parse_range(from, to)?;
        let limit = limit.unwrap_or(DEFAULT_MESSAGE_LIMIT).clamp(1, MAX_MESSAGE_LIMIT);
        let query = created_between(start, end)?.order_by("created_at").limit(limit);
        let documents = self.store.query(ORDERS_COLLECTION, query).await?;
        trace!("📦️ {} messages between {start} and {end}", documents.len());
        Ok(OrderMessages {
            from: iso(start),
            to: iso(end),
            results: documents.iter().map(OrderMessage::from_document).collect(),
        })
    }

    /// Order count, revenue and best-selling products for orders created between `from` and `to`, optionally
    /// restricted to one status.
    pub async fn sales_summary(&self, from: &str, to: &str, status: Option<&str>) -> Result<SalesSummary, RelayError> {
        let (start, end) = parse_range(from, to)?;
        let status = status.map(str::trim).filter(|s| !s.is_empty());
        let mut query = created_between(start, end)?;
        if let Some(status) = status {
            query = query.with_equals("status", Value::from(status.to_string()));
        }
        let documents = self.store.query(ORDERS_COLLECTION, query).await?;

        let total_amount: f64 = documents.iter().map(|doc| parse_amount(&doc["total"])).sum();
        let mut products = HashMap::<String, i64>::new();
        for item in documents.iter().filter_map(|doc| doc["line_items"].as_array()).flatten() {
            let name = match item["name"].as_str().map(str::trim) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => "producto".to_string(),
            };
            let qty = products.entry(name).or_default();
            *qty = qty.saturating_add(parse_amount(&item["quantity"]) as i64);
        }
        let mut top_products =
            products.into_iter().map(|(name, qty)| ProductSales { name, qty }).collect::<Vec<ProductSales>>();
        top_products.sort_by(|a, b| b.qty.cmp(&a.qty).then_with(|| a.name.cmp(&b.name)));
        top_products.truncate(TOP_PRODUCTS);

        Ok(SalesSummary {
            from: iso(start),
            to: iso(end),
            status: status.map(str::to_string),
            total_orders: documents.len(),
            total_amount,
            top_products,
        })
    }
}

fn parse_range(from: &str, to: &str) -> Result<(NaiveDateTime, NaiveDateTime), RelayError> {
    let start =
        parse_timestamp(from, false).ok_or_else(|| RelayError::MalformedInput(format!("Invalid date: {from}")))?;
    let end = parse_timestamp(to, true).ok_or_else(|| RelayError::MalformedInput(format!("Invalid date: {to}")))?;
    Ok((start, end))
}

fn created_between(start: NaiveDateTime, end: NaiveDateTime) -> Result<DocumentQuery, RelayError> {
    let from = serde_json::to_value(start).map_err(|e| RelayError::MalformedInput(e.to_string()))?;
    let to = serde_json::to_value(end).map_err(|e| RelayError::MalformedInput(e.to_string()))?;
    Ok(DocumentQuery::new().with_range("created_at", from, to))
}

fn iso(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
