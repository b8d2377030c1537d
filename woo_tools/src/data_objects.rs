use serde::{Deserialize, Serialize};

/// The handful of order fields the relay cares about in a WooCommerce order response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WooOrderSummary {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date_modified: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusUpdate<'a> {
    pub status: &'a str,
}
