mod documents;
mod errors;

use std::{env, path::Path, str::FromStr};

use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub use documents::SqliteDocumentStore;

use crate::traits::DocumentStoreError;

pub const SQLITE_DB_URL: &str = "sqlite://data/order_relay.db";

pub fn db_url() -> String {
    let result = env::var("RELAY_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ RELAY_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

/// Opens a pool on `url`, creating the database file (and its directory) when it does not exist yet.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, DocumentStoreError> {
    ensure_parent_dir(url);
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

fn ensure_parent_dir(url: &str) {
    let path = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return;
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        match std::fs::create_dir_all(parent) {
            Ok(()) => info!("🗃️ Created database directory {}", parent.display()),
            Err(e) => warn!("🗃️ Could not create database directory {}. {e}", parent.display()),
        }
    }
}
