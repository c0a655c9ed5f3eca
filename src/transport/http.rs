//! HTTP transport: POST JSON, decode the typed reply

use super::{ChatTransport, TransportError};
use crate::protocol::{IncomingReply, OutgoingRequest};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Transport that talks to the backend over HTTP
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &OutgoingRequest) -> Result<IncomingReply, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    TransportError::network(format!("Connection failed: {e}"))
                } else {
                    TransportError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %body, "Backend returned error status");
            return Err(TransportError::Protocol {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(body = %body, "Undecodable reply body");
            TransportError::decode(e.to_string())
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
