//! # Order relay server
//! This crate hosts the HTTP face of the order relay. It is responsible for:
//! * Listening for order webhooks from WooCommerce and acknowledging WooCommerce's ping deliveries.
//! * Handing each order to the [`order_relay_engine::IngestApi`], which stores it and notifies the operators on
//!   WhatsApp.
//! * Serving the stored notification texts and simple sales reports back to operators.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/` and `/health`: Liveness checks. Always open.
//! * `POST /webhook/woocommerce`: The WooCommerce order webhook.
//! * `GET /api/order/{order_number}/message`: The notification text for one order.
//! * `GET /api/orders/messages?from=..&to=..&limit=..`: Notification texts for orders created in a date range.
//! * `GET /api/reports/sales?from=..&to=..&status=..`: Order count, revenue and top products for a date range.
//!
//! When `RELAY_WEBHOOK_SECRET` is set, everything under `/webhook` and `/api` requires the `X-Relay-Secret` header.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
