use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhatsAppApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("The WhatsApp access token or phone number id has not been configured")]
    NotConfigured,
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Message request failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
