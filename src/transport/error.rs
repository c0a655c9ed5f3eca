//! Transport error types

use thiserror::Error;

/// Why a chat request produced no usable reply
///
/// The detail is for logs only; every variant is shown to the user as the
/// same generic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, DNS, timeout or a body that could not be read
    #[error("Network failure: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status
    #[error("Backend returned HTTP {status}")]
    Protocol { status: u16 },
    /// A 2xx body that is not a valid reply
    #[error("Malformed reply: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Short label used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Protocol { .. } => "protocol",
            Self::Decode(_) => "decode",
        }
    }
}
