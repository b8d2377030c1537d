//! Order Relay Engine
//!
//! The engine turns loosely-typed e-commerce order events into operator notifications, exactly once per distinct
//! message within a dedup window. It is provider-agnostic: storage, the messaging channel and the upstream store are
//! all reached through the traits in [`traits`].
//!
//! The pipeline, leaf-first:
//! 1. [`normalizer`] builds an [`db_types::OrderRecord`] from any JSON payload.
//! 2. [`formatter`] renders the record as the notification text.
//! 3. [`dedup`] decides whether that text needs sending, from the fingerprint stored with the order.
//! 4. [`delivery`] fans the message out to every recipient, template first and then free text.
//!
//! [`IngestApi`] wires these together and persists the result. [`OrderQueryApi`] reads stored orders back.
mod db;

pub mod db_types;
pub mod dedup;
pub mod delivery;
pub mod formatter;
pub mod normalizer;
mod relay_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use db::memory::MemoryDocumentStore;
#[cfg(feature = "sqlite")]
pub use db::sqlite::{db_url, SqliteDocumentStore};
pub use relay_api::{
    errors::RelayError,
    ingest_api::{IngestApi, IngestConfig},
    order_query_api::OrderQueryApi,
    relay_objects,
};
