//! Transport for PerpX service calls.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Wait used when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// A unary request/response call to a named service method.
///
/// Bodies are opaque bytes; [`super::PerpxClient`] owns the encoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Rpc: Send + Sync {
    async fn request(&self, service: &str, method: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

/// Calls the backend over HTTP: `POST <base_url>/<service>/<method>`.
#[derive(Debug, Clone)]
pub struct HttpRpc {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpRpc {
    /// Create a transport for `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Endpoint of a service method.
    pub fn endpoint(&self, service: &str, method: &str) -> Result<Url> {
        self.base_url
            .join(&format!("{service}/{method}"))
            .map_err(|e| Error::rpc(service, method, e.to_string()))
    }
}

#[async_trait]
impl Rpc for HttpRpc {
    async fn request(&self, service: &str, method: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let url = self.endpoint(service, method)?;
        tracing::debug!(%url, "RPC request");

        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(
                service,
                method,
                status,
                retry_after.as_deref(),
                &text,
            ));
        }

        Ok(response.bytes().await.map_err(transport_error)?.to_vec())
    }
}

/// Unreachable hosts and timeouts are network failures; the rest stay HTTP errors.
fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() || err.is_connect() {
        Error::network(err.to_string())
    } else {
        Error::Http(err)
    }
}

fn status_error(
    service: &str,
    method: &str,
    status: reqwest::StatusCode,
    retry_after: Option<&str>,
    text: &str,
) -> Error {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let secs = retry_after
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Error::RateLimited(secs);
    }
    Error::rpc(service, method, format!("HTTP {status}: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let rpc = HttpRpc::new("https://perpx-api.bitsflea.com", Duration::from_secs(5)).unwrap();
        assert_eq!(
            rpc.endpoint("perpx.PerpxService", "GetProfile")
                .unwrap()
                .as_str(),
            "https://perpx-api.bitsflea.com/perpx.PerpxService/GetProfile"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let rpc = HttpRpc::new("http://localhost:8080/api", Duration::from_secs(5)).unwrap();
        assert_eq!(
            rpc.endpoint("perpx.PerpxService", "GetStrategies")
                .unwrap()
                .as_str(),
            "http://localhost:8080/api/perpx.PerpxService/GetStrategies"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpRpc::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_too_many_requests_is_rate_limited() {
        let status = reqwest::StatusCode::TOO_MANY_REQUESTS;
        assert!(matches!(
            status_error("svc", "GetProfile", status, Some("12"), ""),
            Error::RateLimited(12)
        ));
        let http_date = Some("Wed, 21 Oct 2015 07:28:00 GMT");
        assert!(matches!(
            status_error("svc", "GetProfile", status, http_date, ""),
            Error::RateLimited(DEFAULT_RETRY_AFTER_SECS)
        ));
        assert!(matches!(
            status_error("svc", "GetProfile", status, None, ""),
            Error::RateLimited(DEFAULT_RETRY_AFTER_SECS)
        ));
    }

    #[test]
    fn test_other_statuses_are_rpc_errors() {
        let err = status_error(
            "svc",
            "AddStrategy",
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            None,
            "boom",
        );
        assert_eq!(
            err.to_string(),
            "RPC error: svc/AddStrategy: HTTP 500 Internal Server Error: boom"
        );
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Nothing listens on the discard port locally.
        let rpc = HttpRpc::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = rpc
            .request("perpx.PerpxService", "GetProfile", b"{}".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)), "got {err}");
        assert!(err.is_recoverable());
    }
}
