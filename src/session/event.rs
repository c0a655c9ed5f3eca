//! Events that can occur in a session

use crate::protocol::IncomingReply;
use crate::transport::TransportError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit { text: String },

    // Transport events
    ReplyReceived { reply: IncomingReply },
    TransportFailed { error: TransportError },
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit { text: text.into() }
    }

    /// Wrap a finished transport call
    pub fn from_transport(result: Result<IncomingReply, TransportError>) -> Self {
        match result {
            Ok(reply) => Event::ReplyReceived { reply },
            Err(error) => Event::TransportFailed { error },
        }
    }
}
