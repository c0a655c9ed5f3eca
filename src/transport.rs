//! Transport to the chat backend
//!
//! One request in, one reply (or failure) out. Implementations never retry.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransport;

use crate::protocol::{IncomingReply, OutgoingRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for the chat endpoint
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one request and wait for its reply
    async fn send(&self, request: &OutgoingRequest) -> Result<IncomingReply, TransportError>;

    /// Where requests go
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, request: &OutgoingRequest) -> Result<IncomingReply, TransportError> {
        (**self).send(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: ChatTransport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: ChatTransport> ChatTransport for LoggingTransport<T> {
    async fn send(&self, request: &OutgoingRequest) -> Result<IncomingReply, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    history_len = request.history.len(),
                    reply_type = reply.kind(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind(),
                    error = %e,
                    "Chat request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
