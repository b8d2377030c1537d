mod api;
mod config;
mod data_objects;
mod error;

pub use api::WooApi;
pub use config::WooConfig;
pub use data_objects::WooOrderSummary;
pub use error::WooApiError;
