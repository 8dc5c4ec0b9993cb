//! `reqwest`-backed transport.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::{Result, ZerodError};

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport. `timeout_secs` of `None` keeps reqwest's default
    /// (no overall timeout).
    pub fn new(timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            ZerodError::Transport(format!("failed to build HTTP client: {}", e))
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn map_reqwest_error(e: reqwest::Error) -> ZerodError {
        if e.is_timeout() {
            ZerodError::Transport(format!("request timed out: {}", e))
        } else if e.is_connect() {
            ZerodError::Transport(format!("connection failed: {}", e))
        } else {
            ZerodError::transport(e)
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Self::map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ZerodError::Transport(format!("failed to read response: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
