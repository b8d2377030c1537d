//! # Order relay public API
//!
//! * [`ingest_api`] runs the notification pipeline for an inbound order event.
//! * [`order_query_api`] serves the stored notification texts and sales summaries back to operators.
//!
//! Both APIs are generic over their backends. Build one by handing it implementations of the traits in
//! [`crate::traits`]:
//!
//! ```rust,ignore
//! let store = SqliteDocumentStore::new_with_url("sqlite://data/order_relay.db", 5).await?;
//! let api = OrderQueryApi::new(store);
//! let message = api.message_for_order("501").await?;
//! ```
pub mod errors;
pub mod ingest_api;
pub mod order_query_api;
pub mod relay_objects;
