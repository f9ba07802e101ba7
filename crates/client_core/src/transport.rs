use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::JsonRpcRequest;

use crate::error::TransportFailure;

/// Status and body of whatever the endpoint answered, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait SignalTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        request: &JsonRpcRequest,
    ) -> Result<RawResponse, TransportFailure>;
}

pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Builds a transport with an explicit per-request timeout instead of the reqwest default.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportFailure> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportFailure::Client(err.to_string()))?;
        Ok(Self { http })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        request: &JsonRpcRequest,
    ) -> Result<RawResponse, TransportFailure> {
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| TransportFailure::Unreachable(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| TransportFailure::Body(err.to_string()))?;
        Ok(RawResponse { status, body })
    }
}
