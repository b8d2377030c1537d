use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use log::*;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::traits::{validate_field, DocumentQuery, DocumentStore, DocumentStoreError};

type Collections = HashMap<String, HashMap<String, Value>>;

/// A volatile [`DocumentStore`]. Clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections.read().await.get(collection).map(HashMap::len).unwrap_or(0)
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), DocumentStoreError> {
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().insert(id.to_string(), document);
        trace!("🗃️ Stored {collection}/{id} in memory");
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn query(&self, collection: &str, query: DocumentQuery) -> Result<Vec<Value>, DocumentStoreError> {
        for field in query.fields() {
            validate_field(field)?;
        }
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut result = documents.values().filter(|doc| matches(doc, &query)).cloned().collect::<Vec<Value>>();
        if let Some(field) = &query.order_by {
            result.sort_by(|a, b| {
                compare(field_value(a, field), field_value(b, field)).unwrap_or(Ordering::Equal)
            });
        }
        if let Some(limit) = query.limit {
            result.truncate(limit);
        }
        Ok(result)
    }
}

fn field_value<'a>(doc: &'a Value, field: &str) -> &'a Value {
    field.split('.').fold(doc, |v, part| &v[part])
}

fn matches(doc: &Value, query: &DocumentQuery) -> bool {
    let in_range = query.range.as_ref().map_or(true, |range| {
        let v = field_value(doc, &range.field);
        matches!(compare(v, &range.from), Some(Ordering::Greater | Ordering::Equal))
            && matches!(compare(v, &range.to), Some(Ordering::Less | Ordering::Equal))
    });
    in_range &&
        query.equals.iter().all(|(field, expected)| {
            let v = field_value(doc, field);
            compare(v, expected).map_or(v == expected, |o| o == Ordering::Equal)
        })
}

/// Strings compare with strings and numbers with numbers. Mixed types are unordered.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
