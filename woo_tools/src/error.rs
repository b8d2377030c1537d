use thiserror::Error;

#[derive(Debug, Error)]
pub enum WooApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("The WooCommerce base url or API credentials have not been configured")]
    NotConfigured,
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
