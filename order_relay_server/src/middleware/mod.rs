mod hmac;
mod shared_secret;

pub use hmac::{HmacMiddlewareFactory, HmacMiddlewareService, WOO_SIGNATURE_HEADER};
pub use shared_secret::{SharedSecretMiddlewareFactory, SharedSecretMiddlewareService, SHARED_SECRET_HEADER};
