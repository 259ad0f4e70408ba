//! PerpX API client wrapper.

use super::demo::DemoRpc;
use super::messages::{
    DeleteStrategyRequest, InvoicesRequest, InvoicesResponse, LoginRequest, LoginResponse,
    StrategiesResponse, StrategyMutation, SuccessResponse, TokenRequest, UpdateEmailRequest,
};
use super::rpc::{HttpRpc, Rpc};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::state::{Invoice, UserProfile};
use crate::strategy::{Strategy, StrategyId, StrategyRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Fully qualified name of the backend service.
pub const SERVICE: &str = "perpx.PerpxService";

/// Builder for creating an API client.
pub struct PerpxClientBuilder {
    config: ApiConfig,
    rpc: Option<Arc<dyn Rpc>>,
}

impl PerpxClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            rpc: None,
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific transport instead of the one the config selects.
    pub fn rpc(mut self, rpc: Arc<dyn Rpc>) -> Self {
        self.rpc = Some(rpc);
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<PerpxClient> {
        let rpc: Arc<dyn Rpc> = match self.rpc {
            Some(rpc) => rpc,
            None if self.config.demo => {
                info!("Using in-memory demo backend");
                Arc::new(DemoRpc::new())
            }
            None => Arc::new(HttpRpc::new(
                &self.config.base_url,
                Duration::from_secs(self.config.timeout_secs),
            )?),
        };
        Ok(PerpxClient::new(rpc, self.config.rate_limit))
    }
}

impl Default for PerpxClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// High-level client for the PerpX service.
#[derive(Clone)]
pub struct PerpxClient {
    rpc: Arc<dyn Rpc>,
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl PerpxClient {
    /// Create a client over any transport.
    pub fn new(rpc: Arc<dyn Rpc>, requests_per_second: u32) -> Self {
        Self {
            rpc,
            rate_limiter: Arc::new(RwLock::new(RateLimiter::new(requests_per_second.max(1)))),
        }
    }

    /// Exchange Telegram init data for a session token.
    pub async fn login_with_telegram(&self, init_data: &str) -> Result<String> {
        let response: LoginResponse = self
            .call(
                "LoginWithTelegram",
                &LoginRequest {
                    init_data: init_data.to_string(),
                },
            )
            .await?;
        if response.token.is_empty() {
            return Err(Error::auth("Login returned an empty token"));
        }
        info!("Signed in with Telegram");
        Ok(response.token)
    }

    /// Fetch the signed-in user.
    pub async fn get_profile(&self, token: &str) -> Result<UserProfile> {
        self.call("GetProfile", &token_request(token)).await
    }

    /// Fetch the user's strategies.
    ///
    /// Records of unknown type or with unreadable params are skipped.
    pub async fn get_strategies(&self, token: &str) -> Result<Vec<Strategy>> {
        let response: StrategiesResponse =
            self.call("GetStrategies", &token_request(token)).await?;

        let strategies = response
            .strategies
            .into_iter()
            .filter_map(|record| {
                if record.known_type().is_none() {
                    warn!(
                        id = record.id,
                        strategy_type = %record.strategy_type,
                        "Skipping strategy of unknown type"
                    );
                    return None;
                }
                let id = record.id;
                match record.into_strategy() {
                    Ok(strategy) => Some(strategy),
                    Err(e) => {
                        warn!(id, "Skipping unreadable strategy: {}", e);
                        None
                    }
                }
            })
            .collect();
        Ok(strategies)
    }

    /// Create a strategy. The backend assigns the ID.
    pub async fn add_strategy(&self, token: &str, strategy: &Strategy) -> Result<bool> {
        let request =
            StrategyMutation::new(token, None, StrategyRecord::from_strategy(strategy)?);
        self.mutate("AddStrategy", &request).await
    }

    /// Replace a stored strategy.
    pub async fn update_strategy(&self, token: &str, strategy: &Strategy) -> Result<bool> {
        let request = StrategyMutation::new(
            token,
            Some(strategy.id),
            StrategyRecord::from_strategy(strategy)?,
        );
        self.mutate("UpdateStrategy", &request).await
    }

    /// Delete a strategy.
    pub async fn delete_strategy(&self, token: &str, id: StrategyId) -> Result<bool> {
        let request = DeleteStrategyRequest {
            token: token.to_string(),
            id,
        };
        self.mutate("DeleteStrategy", &request).await
    }

    /// Change the user's contact email.
    pub async fn update_email(&self, token: &str, email: &str) -> Result<bool> {
        let request = UpdateEmailRequest {
            token: token.to_string(),
            email: email.to_string(),
        };
        self.mutate("UpdateEmail", &request).await
    }

    /// Fetch one page of payment history. Pages start at 1.
    pub async fn get_invoices(&self, token: &str, page: u32, page_size: u32) -> Result<Vec<Invoice>> {
        let request = InvoicesRequest {
            token: token.to_string(),
            page,
            page_size,
        };
        let response: InvoicesResponse = self.call("GetInvoices", &request).await?;
        Ok(response.invoices)
    }

    async fn mutate<Req: Serialize>(&self, method: &str, request: &Req) -> Result<bool> {
        let response: SuccessResponse = self.call(method, request).await?;
        if !response.success && !response.message.is_empty() {
            warn!(method, "Request rejected: {}", response.message);
        }
        Ok(response.success)
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        self.rate_limit().await?;
        let body = serde_json::to_vec(request)?;
        let bytes = self.rpc.request(SERVICE, method, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Apply rate limiting.
    async fn rate_limit(&self) -> Result<()> {
        let mut limiter = self.rate_limiter.write().await;
        limiter.wait().await
    }
}

fn token_request(token: &str) -> TokenRequest {
    TokenRequest {
        token: token.to_string(),
    }
}

/// Simple rate limiter.
struct RateLimiter {
    requests_per_second: u32,
    last_request: std::time::Instant,
    tokens: f64,
}

impl RateLimiter {
    fn new(requests_per_second: u32) -> Self {
        Self {
            requests_per_second,
            last_request: std::time::Instant::now(),
            tokens: requests_per_second as f64,
        }
    }

    async fn wait(&mut self) -> Result<()> {
        let now = std::time::Instant::now();
        let elapsed = now.duration_since(self.last_request).as_secs_f64();

        // Replenish tokens
        self.tokens = (self.tokens + elapsed * self.requests_per_second as f64)
            .min(self.requests_per_second as f64);

        if self.tokens < 1.0 {
            let wait_time = (1.0 - self.tokens) / self.requests_per_second as f64;
            tokio::time::sleep(Duration::from_secs_f64(wait_time)).await;
            self.tokens = 1.0;
        }

        self.tokens -= 1.0;
        self.last_request = std::time::Instant::now();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rpc::MockRpc;
    use crate::strategy::{FundingRateParams, StrategyKind};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn client(rpc: MockRpc) -> PerpxClient {
        PerpxClient::new(Arc::new(rpc), 100)
    }

    fn reply(value: Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&value).unwrap())
    }

    fn body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_sends_init_data() {
        let mut rpc = MockRpc::new();
        rpc.expect_request().times(1).returning(|service, method, bytes| {
            assert_eq!(service, SERVICE);
            assert_eq!(method, "LoginWithTelegram");
            assert_eq!(body(&bytes), json!({"initData": "user=1&hash=x"}));
            reply(json!({"token": "tok"}))
        });

        let token = client(rpc).login_with_telegram("user=1&hash=x").await.unwrap();
        assert_eq!(token, "tok");
    }

    #[tokio::test]
    async fn test_empty_login_token_is_auth_error() {
        let mut rpc = MockRpc::new();
        rpc.expect_request()
            .returning(|_, _, _| reply(json!({"token": ""})));

        let err = client(rpc).login_with_telegram("x").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn test_get_strategies_skips_unknown_types() {
        let mut rpc = MockRpc::new();
        rpc.expect_request().returning(|_, method, bytes| {
            assert_eq!(method, "GetStrategies");
            assert_eq!(body(&bytes), json!({"token": "tok"}));
            reply(json!({"strategies": [
                {"id": 1, "strategyType": "FundingRate", "symbol": "BTCUSDT", "period": "", "params": "{\"fundingRate\":0.02}"},
                {"id": 2, "strategyType": "GridBot", "symbol": "ETHUSDT", "period": "5m", "params": "{}"},
                {"id": 3, "strategyType": "ConsecutiveMove", "symbol": "SOLUSDT", "period": "5m", "params": "not json"}
            ]}))
        });

        let strategies = client(rpc).get_strategies("tok").await.unwrap();
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].id, 1);
        assert_eq!(
            strategies[0].kind,
            StrategyKind::FundingRate {
                params: FundingRateParams { funding_rate: 0.02 }
            }
        );
    }

    #[tokio::test]
    async fn test_add_omits_id_and_update_carries_it() {
        let strategy = Strategy {
            id: 5,
            symbol: "BTCUSDT".to_string(),
            created_at: None,
            kind: StrategyKind::FundingRate {
                params: FundingRateParams { funding_rate: 0.01 },
            },
        };

        let mut rpc = MockRpc::new();
        rpc.expect_request().times(2).returning(|_, method, bytes| {
            let sent = body(&bytes);
            match method {
                "AddStrategy" => assert!(sent.get("id").is_none()),
                "UpdateStrategy" => assert_eq!(sent["id"], 5),
                other => panic!("unexpected method {other}"),
            }
            assert_eq!(sent["strategyType"], "FundingRate");
            assert_eq!(sent["params"], "{\"fundingRate\":0.01}");
            reply(json!({"success": true}))
        });

        let client = client(rpc);
        assert!(client.add_strategy("tok", &strategy).await.unwrap());
        assert!(client.update_strategy("tok", &strategy).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejected_mutation_returns_false() {
        let mut rpc = MockRpc::new();
        rpc.expect_request()
            .returning(|_, _, _| reply(json!({"success": false, "message": "quota"})));

        assert!(!client(rpc).delete_strategy("tok", 4).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_invoices_paging() {
        let mut rpc = MockRpc::new();
        rpc.expect_request().returning(|_, method, bytes| {
            assert_eq!(method, "GetInvoices");
            assert_eq!(
                body(&bytes),
                json!({"token": "tok", "page": 2, "pageSize": 10})
            );
            reply(json!({"invoices": [{"invoiceId": "a", "status": "paid", "amount": "10"}]}))
        });

        let invoices = client(rpc).get_invoices("tok", 2, 10).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].invoice_id, "a");
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut rpc = MockRpc::new();
        rpc.expect_request()
            .returning(|service, method, _| Err(Error::rpc(service, method, "HTTP 401")));

        let err = client(rpc).get_profile("bad").await.unwrap_err();
        assert!(matches!(err, Error::Rpc { .. }));
    }

    #[test]
    fn test_builder_selects_demo_backend() {
        let config = ApiConfig {
            demo: true,
            ..ApiConfig::default()
        };
        let client = PerpxClientBuilder::new().config(config).build().unwrap();
        let profile = tokio_test::block_on(async {
            let token = client.login_with_telegram("demo").await?;
            client.get_profile(&token).await
        })
        .unwrap();
        assert!(profile.is_subscribed());
    }
}
