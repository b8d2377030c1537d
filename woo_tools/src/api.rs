use std::sync::Arc;

use log::*;
use reqwest::{header::HeaderValue, Client, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::{config::WooConfig, data_objects::StatusUpdate, WooApiError, WooOrderSummary};

#[derive(Clone)]
pub struct WooApi {
    config: WooConfig,
    client: Arc<Client>,
}

impl WooApi {
    pub fn new(config: WooConfig) -> Result<Self, WooApiError> {
        let mut headers = reqwest::header::HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| WooApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, WooApiError> {
        if !self.is_configured() {
            return Err(WooApiError::NotConfigured);
        }
        let url = self.url(path);
        trace!("🧾️ Sending REST query: {method} {url}");
        let credentials = [
            ("consumer_key", self.config.consumer_key.reveal().as_str()),
            ("consumer_secret", self.config.consumer_secret.reveal().as_str()),
        ];
        let mut req = self.client.request(method, url).query(&credentials);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| WooApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🧾️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| WooApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| WooApiError::RestRequestError(e.to_string()))?;
            Err(WooApiError::QueryError { status, message })
        }
    }

    pub async fn get_order(&self, order_id: i64) -> Result<WooOrderSummary, WooApiError> {
        let path = format!("/orders/{order_id}");
        debug!("🧾️ Fetching order #{order_id}");
        let order = self.rest_query::<WooOrderSummary, ()>(Method::GET, &path, None).await?;
        Ok(order)
    }

    /// Sets the status of the order, e.g. to `on-hold`. Returns the order as WooCommerce sees it afterwards.
    pub async fn update_order_status(&self, order_id: i64, status: &str) -> Result<WooOrderSummary, WooApiError> {
        let path = format!("/orders/{order_id}");
        debug!("🧾️ Setting status of order #{order_id} to '{status}'");
        let body = StatusUpdate { status };
        let order = self.rest_query::<WooOrderSummary, StatusUpdate>(Method::PUT, &path, Some(body)).await?;
        info!("🧾️ Order #{order_id} status is now '{}'", order.status);
        Ok(order)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock,
        MockServer,
        ResponseTemplate,
    };

    use super::*;
    use relay_common::Secret;

    fn config_for(server: &MockServer) -> WooConfig {
        WooConfig {
            base_url: format!("{}/wp-json/wc/v3", server.uri()),
            consumer_key: Secret::new("ck_test".into()),
            consumer_secret: Secret::new("cs_test".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn update_status() {
        let _ = env_logger::try_init();
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/wp-json/wc/v3/orders/501"))
            .and(query_param("consumer_key", "ck_test"))
            .and(query_param("consumer_secret", "cs_test"))
            .and(body_json(json!({"status": "on-hold"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 501, "number": "501", "status": "on-hold"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let api = WooApi::new(config_for(&server)).unwrap();
        let order = api.update_order_status(501, "on-hold").await.unwrap();
        assert_eq!(order.id, 501);
        assert_eq!(order.status, "on-hold");
    }

    #[tokio::test]
    async fn failed_update_reports_status_code() {
        let _ = env_logger::try_init();
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(404).set_body_string("woocommerce_rest_shop_order_invalid_id"))
            .mount(&server)
            .await;
        let api = WooApi::new(config_for(&server)).unwrap();
        let err = api.update_order_status(999, "on-hold").await.unwrap_err();
        assert!(matches!(err, WooApiError::QueryError { status: 404, .. }));
    }

    #[tokio::test]
    async fn unconfigured_client_is_rejected() {
        let api = WooApi::new(WooConfig::default()).unwrap();
        assert!(matches!(api.get_order(1).await, Err(WooApiError::NotConfigured)));
    }
}
