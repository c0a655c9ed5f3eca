//! Runtime for executing chat sessions
//!
//! A session runs as a single task that owns its status, history and render
//! sink. Callers talk to it through a [`SessionHandle`]; transport calls run
//! in the background and report back to the same task, so a second submit can
//! arrive (and be rejected) while a reply is pending.

mod executor;


pub use executor::SessionRuntime;

use crate::render::RenderSink;
use crate::session::{Rejected, SessionStatus, Turn};
use crate::transport::ChatTransport;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Requests a handle can make of its session
#[derive(Debug)]
pub(crate) enum Command {
    Submit {
        text: String,
        ack: oneshot::Sender<Result<(), Rejected>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}

/// Point-in-time copy of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub history: Vec<Turn>,
}

/// Errors returned by [`SessionHandle`]
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] Rejected),
    #[error("Session has shut down")]
    Closed,
}

/// Handle to interact with a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: Uuid,
    command_tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Submit user text
    ///
    /// Resolves once the submit has been admitted (or rejected), not when the
    /// reply arrives. The reply reaches the caller only through the sink.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let (ack, response) = oneshot::channel();
        self.command_tx
            .send(Command::Submit {
                text: text.into(),
                ack,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)??;
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }

    /// Stop accepting input; a pending reply is still delivered before exit
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(Command::Shutdown).await;
    }
}

/// Start a session in the background
///
/// The returned join handle completes once the session has shut down and any
/// in-flight reply has been rendered.
pub fn start_session<T, R>(transport: T, sink: R) -> (SessionHandle, JoinHandle<()>)
where
    T: ChatTransport + 'static,
    R: RenderSink + 'static,
{
    let session_id = Uuid::new_v4();
    let (command_tx, command_rx) = mpsc::channel(32);
    let runtime = SessionRuntime::new(session_id, transport, sink, command_rx);
    let task = tokio::spawn(runtime.run());

    (
        SessionHandle {
            session_id,
            command_tx,
        },
        task,
    )
}
