use std::fmt::Debug;

use log::*;
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::new_pool;
use crate::traits::{validate_field, DocumentQuery, DocumentStore, DocumentStoreError};

/// A [`DocumentStore`] backed by a single SQLite table holding JSON documents.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDocumentStore ({})", self.url)
    }
}

impl SqliteDocumentStore {
    /// Connects to `url` and brings the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, DocumentStoreError> {
        let pool = new_pool(url, max_connections).await?;
        sqlx::migrate!("./src/db/sqlite/migrations").run(&pool).await?;
        debug!("🗃️ Document store at {url} is ready");
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

fn json_path(field: &str) -> String {
    format!("$.{field}")
}

/// Binds a JSON value so that it compares naturally against the result of `json_extract`.
fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::String(s) => builder.push_bind(s.clone()),
        Value::Bool(b) => builder.push_bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => builder.push_bind(i),
            None => builder.push_bind(n.as_f64().unwrap_or_default()),
        },
        v => builder.push_bind(v.to_string()),
    };
}

impl DocumentStore for SqliteDocumentStore {
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), DocumentStoreError> {
        let document = serde_json::to_string(&document)?;
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, document) VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET document = excluded.document, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(document)
        .execute(&self.pool)
        .await?;
        trace!("🗃️ Stored {collection}/{id}");
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError> {
        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let document = document.map(|d| serde_json::from_str::<Value>(&d)).transpose()?;
        Ok(document)
    }

    async fn query(&self, collection: &str, query: DocumentQuery) -> Result<Vec<Value>, DocumentStoreError> {
        for field in query.fields() {
            validate_field(field)?;
        }
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT document FROM documents WHERE collection = ");
        builder.push_bind(collection.to_string());
        if let Some(range) = &query.range {
            builder.push(" AND json_extract(document, ");
            builder.push_bind(json_path(&range.field));
            builder.push(") BETWEEN ");
            push_value(&mut builder, &range.from);
            builder.push(" AND ");
            push_value(&mut builder, &range.to);
        }
        for (field, value) in &query.equals {
            builder.push(" AND json_extract(document, ");
            builder.push_bind(json_path(field));
            if value.is_null() {
                builder.push(") IS NULL");
            } else {
                builder.push(") = ");
                push_value(&mut builder, value);
            }
        }
        if let Some(field) = &query.order_by {
            builder.push(" ORDER BY json_extract(document, ");
            builder.push_bind(json_path(field));
            builder.push(") ASC");
        }
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        trace!("🗃️ Executing query: {}", builder.sql());
        let rows = builder.build_query_scalar::<String>().fetch_all(&self.pool).await?;
        let documents = rows.iter().map(|d| serde_json::from_str::<Value>(d)).collect::<Result<Vec<Value>, _>>()?;
        trace!("🗃️ {} documents in {collection} matched", documents.len());
        Ok(documents)
    }
}
