//! Static shared-secret guard.
//!
//! When a secret is configured, every request through the wrapped scope must carry it verbatim in the
//! `X-Relay-Secret` header. Requests without it are rejected with `401 Unauthorized` before reaching the handler.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use relay_common::Secret;
use subtle::ConstantTimeEq;

pub const SHARED_SECRET_HEADER: &str = "X-Relay-Secret";

pub struct SharedSecretMiddlewareFactory {
    header: String,
    secret: Secret<String>,
}

impl SharedSecretMiddlewareFactory {
    /// An empty `secret` disables the check.
    pub fn new(header: &str, secret: Secret<String>) -> Self {
        Self { header: header.into(), secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SharedSecretMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SharedSecretMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SharedSecretMiddlewareService {
            header: self.header.clone(),
            secret: self.secret.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct SharedSecretMiddlewareService<S> {
    header: String,
    secret: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SharedSecretMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        if self.secret.is_empty() {
            return Box::pin(async move { service.call(req).await });
        }
        let provided = req.headers().get(self.header.as_str()).and_then(|v| v.to_str().ok()).map(str::trim);
        let authorized = provided.map(|p| secrets_match(p, self.secret.reveal().trim())).unwrap_or(false);
        if authorized {
            trace!("🔐️ Shared secret accepted for {}", req.path());
            Box::pin(async move { service.call(req).await })
        } else {
            warn!("🔐️ Missing or invalid {} header on {}. Denying access.", self.header, req.path());
            Box::pin(async move { Err(ErrorUnauthorized("Invalid or missing shared secret.")) })
        }
    }
}

// Constant-time in the content; only the length leaks.
fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
