//! Signed-in session.
//!
//! A [`Session`] holds the backend client, the stored token, and the user it
//! belongs to. It is built once at startup and passed to whatever needs to
//! make authenticated calls.

mod token_store;

pub use token_store::{TOKEN_KEY, TokenStore};

use crate::api::PerpxClient;
use crate::error::{Error, Result};
use crate::state::UserProfile;
use tracing::{info, warn};

/// Authentication state and the client it authenticates.
pub struct Session {
    client: PerpxClient,
    tokens: TokenStore,
    telegram_init_data: Option<String>,
    token: Option<String>,
    user: Option<UserProfile>,
}

impl Session {
    /// Create a signed-out session.
    pub fn new(client: PerpxClient, tokens: TokenStore, telegram_init_data: Option<String>) -> Self {
        Self {
            client,
            tokens,
            telegram_init_data: telegram_init_data.filter(|d| !d.trim().is_empty()),
            token: None,
            user: None,
        }
    }

    /// Sign in from the stored token or Telegram init data.
    ///
    /// A stored token that no longer yields a profile is deleted and the
    /// session stays signed out. Without a stored token, the Telegram init
    /// data (if any) is exchanged for a new one.
    pub async fn restore(&mut self) -> Result<Option<UserProfile>> {
        if let Some(token) = self.tokens.load()? {
            return match self.client.get_profile(&token).await {
                Ok(profile) => {
                    info!(user = %profile.telegram_name, "Session restored");
                    Ok(Some(self.sign_in(token, profile)))
                }
                Err(e) => {
                    warn!("Stored token rejected, signing out: {}", e);
                    self.tokens.clear()?;
                    self.sign_out();
                    Ok(None)
                }
            };
        }

        let Some(init_data) = self.telegram_init_data.clone() else {
            info!("No stored token or Telegram init data, staying signed out");
            return Ok(None);
        };

        let token = self.client.login_with_telegram(&init_data).await?;
        self.tokens.save(&token)?;
        let profile = self.client.get_profile(&token).await?;
        Ok(Some(self.sign_in(token, profile)))
    }

    /// Re-read the user's profile.
    pub async fn refresh_profile(&mut self) -> Result<UserProfile> {
        let token = self.require_token()?.to_string();
        let profile = self.client.get_profile(&token).await?;
        self.user = Some(profile.clone());
        Ok(profile)
    }

    /// Current token, if signed in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Current token, or an auth error when signed out.
    pub fn require_token(&self) -> Result<&str> {
        self.token()
            .ok_or_else(|| Error::auth("Open PerpX from Telegram to sign in"))
    }

    /// Signed-in user.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Backend client.
    pub fn client(&self) -> &PerpxClient {
        &self.client
    }

    fn sign_in(&mut self, token: String, profile: UserProfile) -> UserProfile {
        self.token = Some(token);
        self.user = Some(profile.clone());
        profile
    }

    fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::token_store::temp_store;
    use super::*;
    use crate::api::MockRpc;
    use crate::error::Error;
    use serde_json::json;
    use std::sync::Arc;

    fn profile_reply() -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&json!({"telegramName": "alice", "maxStrategies": 5})).unwrap())
    }

    fn session(rpc: MockRpc, tokens: TokenStore, init_data: Option<&str>) -> Session {
        Session::new(
            PerpxClient::new(Arc::new(rpc), 100),
            tokens,
            init_data.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_restore_with_stored_token() {
        let tokens = temp_store();
        tokens.save("saved").unwrap();

        let mut rpc = MockRpc::new();
        rpc.expect_request().times(1).returning(|_, method, body| {
            assert_eq!(method, "GetProfile");
            assert_eq!(
                serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
                json!({"token": "saved"})
            );
            profile_reply()
        });

        let mut session = session(rpc, tokens.clone(), Some("ignored"));
        let user = session.restore().await.unwrap().unwrap();
        assert_eq!(user.telegram_name, "alice");
        assert_eq!(session.token(), Some("saved"));
        tokens.clear().unwrap();
    }

    #[tokio::test]
    async fn test_rejected_token_is_cleared() {
        let tokens = temp_store();
        tokens.save("expired").unwrap();

        let mut rpc = MockRpc::new();
        rpc.expect_request()
            .times(1)
            .returning(|service, method, _| Err(Error::rpc(service, method, "HTTP 401")));

        let mut session = session(rpc, tokens.clone(), Some("init"));
        assert!(session.restore().await.unwrap().is_none());
        assert!(!session.is_signed_in());
        assert_eq!(tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_telegram_login_stores_token() {
        let tokens = temp_store();

        let mut rpc = MockRpc::new();
        rpc.expect_request().times(2).returning(|_, method, _| match method {
            "LoginWithTelegram" => Ok(serde_json::to_vec(&json!({"token": "fresh"})).unwrap()),
            "GetProfile" => profile_reply(),
            other => panic!("unexpected method {other}"),
        });

        let mut session = session(rpc, tokens.clone(), Some("query_id=1"));
        assert!(session.restore().await.unwrap().is_some());
        assert_eq!(tokens.load().unwrap().as_deref(), Some("fresh"));
        assert_eq!(session.user().map(|u| u.max_strategies), Some(5));
        tokens.clear().unwrap();
    }

    #[tokio::test]
    async fn test_signed_out_without_credentials() {
        let mut rpc = MockRpc::new();
        rpc.expect_request().never();

        let mut session = session(rpc, temp_store(), Some("   "));
        assert!(session.restore().await.unwrap().is_none());
        assert!(matches!(session.require_token(), Err(Error::Auth(_))));
    }
}
