//! In-memory PerpX backend.
//!
//! Answers every service method from local state so the app can be tried
//! without an account. Enabled with `api.demo = true`.

use super::client::SERVICE;
use super::messages::{
    DeleteStrategyRequest, InvoicesRequest, InvoicesResponse, LoginRequest, LoginResponse,
    StrategiesResponse, StrategyMutation, SuccessResponse, TokenRequest, UpdateEmailRequest,
};
use super::rpc::Rpc;
use crate::error::{Error, Result};
use crate::state::{Invoice, UserProfile};
use crate::strategy::{StrategyId, StrategyRecord};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Token issued by the demo backend.
pub const DEMO_TOKEN: &str = "demo-token";

#[derive(Debug)]
struct DemoState {
    profile: UserProfile,
    strategies: Vec<StrategyRecord>,
    next_id: StrategyId,
    invoices: Vec<Invoice>,
}

/// In-memory implementation of [`Rpc`].
#[derive(Debug)]
pub struct DemoRpc {
    state: Mutex<DemoState>,
}

impl DemoRpc {
    /// Backend seeded with a subscribed user, two strategies, and a payment history.
    pub fn new() -> Self {
        let now = Utc::now();
        let profile = UserProfile {
            telegram_id: 10001,
            telegram_name: "demo".to_string(),
            max_strategies: 10,
            active: true,
            subscription_start: Some(now - Duration::days(45)),
            subscription_end: Some(now + Duration::days(45)),
            email: "demo@perpx.app".to_string(),
            ..Default::default()
        };

        let strategies = vec![
            StrategyRecord {
                id: 1,
                strategy_type: "VolatilitySpike".to_string(),
                symbol: "BTCUSDT".to_string(),
                period: "15m".to_string(),
                params: r#"{"volume":1000000,"turnover":50000000,"amplitudeMultiple":2.5}"#
                    .to_string(),
            },
            StrategyRecord {
                id: 2,
                strategy_type: "FundingRate".to_string(),
                symbol: "ETHUSDT".to_string(),
                period: String::new(),
                params: r#"{"fundingRate":0.01}"#.to_string(),
            },
        ];

        let invoices = (0..12)
            .map(|i| Invoice {
                invoice_id: Uuid::new_v4().to_string(),
                status: if i == 0 { "pending" } else { "paid" }.to_string(),
                amount: if i % 4 == 0 { dec!(85) } else { dec!(25) },
                currency: "USDT".to_string(),
                paid_at: Some(now - Duration::days(30 * i)),
                chain: "BSC".to_string(),
                tx_hash: format!("0x{}", Uuid::new_v4().simple()),
            })
            .collect();

        Self {
            state: Mutex::new(DemoState {
                profile,
                strategies,
                next_id: 3,
                invoices,
            }),
        }
    }

    async fn handle(&self, method: &str, body: &[u8]) -> Result<Vec<u8>> {
        if method == "LoginWithTelegram" {
            let request: LoginRequest = serde_json::from_slice(body)?;
            if request.init_data.is_empty() {
                return Err(Error::rpc(SERVICE, method, "HTTP 401: missing init data"));
            }
            return encode(&LoginResponse {
                token: DEMO_TOKEN.to_string(),
            });
        }

        let mut state = self.state.lock().await;
        match method {
            "GetProfile" => {
                authorize::<TokenRequest>(method, body, |r| &r.token)?;
                encode(&state.profile)
            }
            "GetStrategies" => {
                authorize::<TokenRequest>(method, body, |r| &r.token)?;
                encode(&StrategiesResponse {
                    strategies: state.strategies.clone(),
                })
            }
            "AddStrategy" => {
                let request = authorize::<StrategyMutation>(method, body, |r| &r.token)?;
                if state.strategies.len() >= state.profile.max_strategies as usize {
                    return encode(&rejected("Strategy limit reached"));
                }
                let id = state.next_id;
                state.next_id += 1;
                state.strategies.push(record(id, request));
                encode(&accepted())
            }
            "UpdateStrategy" => {
                let request = authorize::<StrategyMutation>(method, body, |r| &r.token)?;
                let id = request.id.unwrap_or_default();
                match state.strategies.iter_mut().find(|s| s.id == id) {
                    Some(existing) => {
                        *existing = record(id, request);
                        encode(&accepted())
                    }
                    None => encode(&rejected("Strategy not found")),
                }
            }
            "DeleteStrategy" => {
                let request = authorize::<DeleteStrategyRequest>(method, body, |r| &r.token)?;
                let before = state.strategies.len();
                state.strategies.retain(|s| s.id != request.id);
                if state.strategies.len() < before {
                    encode(&accepted())
                } else {
                    encode(&rejected("Strategy not found"))
                }
            }
            "UpdateEmail" => {
                let request = authorize::<UpdateEmailRequest>(method, body, |r| &r.token)?;
                state.profile.email = request.email;
                encode(&accepted())
            }
            "GetInvoices" => {
                let request = authorize::<InvoicesRequest>(method, body, |r| &r.token)?;
                let size = request.page_size.max(1) as usize;
                let start = request.page.saturating_sub(1) as usize * size;
                let invoices = state.invoices.iter().skip(start).take(size).cloned().collect();
                encode(&InvoicesResponse { invoices })
            }
            other => Err(Error::rpc(SERVICE, other, "HTTP 404: unknown method")),
        }
    }
}

impl Default for DemoRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rpc for DemoRpc {
    async fn request(&self, service: &str, method: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        if service != SERVICE {
            return Err(Error::rpc(service, method, "HTTP 404: unknown service"));
        }
        self.handle(method, &body).await
    }
}

fn authorize<T: DeserializeOwned>(
    method: &str,
    body: &[u8],
    token: impl FnOnce(&T) -> &String,
) -> Result<T> {
    let request: T = serde_json::from_slice(body)?;
    if token(&request) != DEMO_TOKEN {
        return Err(Error::rpc(SERVICE, method, "HTTP 401: invalid token"));
    }
    Ok(request)
}

fn record(id: StrategyId, request: StrategyMutation) -> StrategyRecord {
    StrategyRecord {
        id,
        strategy_type: request.strategy_type,
        symbol: request.symbol,
        period: request.period,
        params: request.params,
    }
}

fn accepted() -> SuccessResponse {
    SuccessResponse {
        success: true,
        message: String::new(),
    }
}

fn rejected(message: &str) -> SuccessResponse {
    SuccessResponse {
        success: false,
        message: message.to_string(),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}
