use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Query parameters for `/api/orders/messages`. Dates are `YYYY-MM-DD` or ISO-8601 timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesQuery {
    #[serde(alias = "desde")]
    pub from: String,
    #[serde(alias = "hasta")]
    pub to: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query parameters for `/api/reports/sales`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesQuery {
    #[serde(alias = "desde")]
    pub from: String,
    #[serde(alias = "hasta")]
    pub to: String,
    #[serde(default)]
    pub status: Option<String>,
}
