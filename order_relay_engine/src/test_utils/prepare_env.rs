use log::*;

pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

/// A fresh SQLite database url in the system temp directory.
pub fn random_db_url() -> String {
    let path = std::env::temp_dir().join(format!("order_relay_test_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

#[cfg(feature = "sqlite")]
pub async fn new_test_store() -> crate::SqliteDocumentStore {
    prepare_test_env();
    let url = random_db_url();
    let store = crate::SqliteDocumentStore::new_with_url(&url, 5).await.expect("Error creating test database");
    info!("🚀️ Created test database {url}");
    store
}
