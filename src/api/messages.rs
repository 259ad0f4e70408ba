//! Request and response bodies of the PerpX service.

use crate::state::Invoice;
use crate::strategy::{StrategyId, StrategyRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub init_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
}

/// Body of calls that only carry the session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategiesResponse {
    pub strategies: Vec<StrategyRecord>,
}

/// Add or update a strategy. `id` is omitted when adding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyMutation {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StrategyId>,
    pub strategy_type: String,
    pub symbol: String,
    pub period: String,
    pub params: String,
}

impl StrategyMutation {
    pub fn new(token: &str, id: Option<StrategyId>, record: StrategyRecord) -> Self {
        Self {
            token: token.to_string(),
            id,
            strategy_type: record.strategy_type,
            symbol: record.symbol,
            period: record.period,
            params: record.params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStrategyRequest {
    pub token: String,
    pub id: StrategyId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    pub token: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicesRequest {
    pub token: String,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoicesResponse {
    pub invoices: Vec<Invoice>,
}

/// Outcome of a mutating call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}
