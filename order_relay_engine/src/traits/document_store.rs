use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DocumentStoreError {
    #[error("Could not reach the document store: {0}")]
    ConnectionError(String),
    #[error("Document store query failed: {0}")]
    QueryError(String),
    #[error("Could not (de)serialize document: {0}")]
    SerializationError(String),
    #[error("Invalid field name for a query: {0}")]
    InvalidField(String),
}

impl From<serde_json::Error> for DocumentStoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// An inclusive range condition on a document field. Values compare as strings when both sides are strings and as
/// numbers when both are numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub field: String,
    pub from: Value,
    pub to: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    pub range: Option<RangeFilter>,
    pub equals: Vec<(String, Value)>,
    /// Ascending sort field.
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range<S: Into<String>>(mut self, field: S, from: Value, to: Value) -> Self {
        self.range = Some(RangeFilter { field: field.into(), from, to });
        self
    }

    pub fn with_equals<S: Into<String>>(mut self, field: S, value: Value) -> Self {
        self.equals.push((field.into(), value));
        self
    }

    pub fn order_by<S: Into<String>>(mut self, field: S) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// All the field names the query touches.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.range
            .iter()
            .map(|r| r.field.as_str())
            .chain(self.equals.iter().map(|(f, _)| f.as_str()))
            .chain(self.order_by.iter().map(String::as_str))
    }
}

/// Field names are restricted to identifiers (optionally dotted) so they can be embedded in JSON paths.
pub fn validate_field(field: &str) -> Result<(), DocumentStoreError> {
    let valid = !field.is_empty()
        && field.split('.').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    if valid {
        Ok(())
    } else {
        Err(DocumentStoreError::InvalidField(field.to_string()))
    }
}

/// A collection-scoped JSON document store with upsert-by-id semantics.
#[allow(async_fn_in_trait)]
pub trait DocumentStore: Clone {
    /// Inserts `document` under `id`, replacing any existing document.
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), DocumentStoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError>;

    async fn query(&self, collection: &str, query: DocumentQuery) -> Result<Vec<Value>, DocumentStoreError>;
}
