//! Request handler definitions
//!
//! Define each route and its handler here. The webhook handler lives in [`crate::webhook_routes`].
//!
//! Handlers never block: everything that touches the store or the network is awaited, so a slow WhatsApp call
//! does not hold up the worker's other requests.
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use order_relay_engine::{traits::DocumentStore, OrderQueryApi};
use serde_json::json;

use crate::{
    data_objects::{MessagesQuery, SalesQuery},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Service  ----------------------------------------------------
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({"service": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION"), "status": "ok"}))
}

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(json!({"ok": true, "ts": Utc::now().to_rfc3339()}))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(order_message => Get "/order/{order_number}/message" impl DocumentStore);
/// Returns the notification text of a single order, for copy/paste. The order is looked up by its upstream id first,
/// then by its display number.
pub async fn order_message<S: DocumentStore>(
    path: web::Path<String>,
    api: web::Data<OrderQueryApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let order_number = path.into_inner();
    debug!("💻️ GET message for order {order_number}");
    let message = api
        .message_for_order(&order_number)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Order {order_number} was not found")))?;
    Ok(HttpResponse::Ok().json(message))
}

route!(order_messages => Get "/orders/messages" impl DocumentStore);
pub async fn order_messages<S: DocumentStore>(
    query: web::Query<MessagesQuery>,
    api: web::Data<OrderQueryApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    debug!("💻️ GET order messages from {} to {}", query.from, query.to);
    let messages = api.messages_in_range(&query.from, &query.to, query.limit).await?;
    Ok(HttpResponse::Ok().json(messages))
}

//----------------------------------------------   Reports  ----------------------------------------------------
route!(sales_report => Get "/reports/sales" impl DocumentStore);
pub async fn sales_report<S: DocumentStore>(
    query: web::Query<SalesQuery>,
    api: web::Data<OrderQueryApi<S>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    debug!("💻️ GET sales report from {} to {} (status: {:?})", query.from, query.to, query.status);
    let summary = api.sales_summary(&query.from, &query.to, query.status.as_deref()).await?;
    Ok(HttpResponse::Ok().json(summary))
}
