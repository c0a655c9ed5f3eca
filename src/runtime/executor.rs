//! Session runtime executor

use super::{Command, SessionSnapshot};
use crate::protocol::{IncomingReply, OutgoingRequest};
use crate::render::RenderSink;
use crate::session::{transition, Effect, Event, History, Rejected, SessionStatus, TransitionError};
use crate::transport::{ChatTransport, TransportError};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

type Completion = Result<IncomingReply, TransportError>;

/// Generic session runtime that can work with any transport and sink
pub struct SessionRuntime<T, R>
where
    T: ChatTransport + 'static,
    R: RenderSink + 'static,
{
    session_id: Uuid,
    status: SessionStatus,
    history: History,
    transport: Arc<T>,
    sink: R,
    command_rx: mpsc::Receiver<Command>,
    completion_tx: mpsc::Sender<Completion>,
    completion_rx: mpsc::Receiver<Completion>,
    /// Set once the session stops taking commands
    draining: bool,
}

impl<T, R> SessionRuntime<T, R>
where
    T: ChatTransport + 'static,
    R: RenderSink + 'static,
{
    pub(crate) fn new(
        session_id: Uuid,
        transport: T,
        sink: R,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(8);
        Self {
            session_id,
            status: SessionStatus::Idle,
            history: History::new(),
            transport: Arc::new(transport),
            sink,
            command_rx,
            completion_tx,
            completion_rx,
            draining: false,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.session_id,
            endpoint = %self.transport.endpoint(),
            "Starting session runtime"
        );

        loop {
            tokio::select! {
                Some(result) = self.completion_rx.recv() => {
                    // Completions are never rejected
                    let _ = self.process_event(Event::from_transport(result));
                }
                command = self.command_rx.recv(), if !self.draining => {
                    match command {
                        Some(command) => self.handle_command(command),
                        // Every handle dropped
                        None => self.draining = true,
                    }
                }
            }

            if self.draining && !self.status.is_busy() {
                break;
            }
        }

        tracing::info!(
            session_id = %self.session_id,
            turns = self.history.turns().len(),
            "Session runtime stopped"
        );
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Submit { text, ack } => {
                let result = self.process_event(Event::submit(text));
                let _ = ack.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(SessionSnapshot {
                    status: self.status,
                    history: self.history.snapshot(),
                });
            }
            Command::Shutdown => {
                tracing::debug!(
                    session_id = %self.session_id,
                    pending = self.status.is_busy(),
                    "Shutdown requested"
                );
                self.draining = true;
            }
        }
    }

    /// Run one event through the state machine and carry out its effects
    ///
    /// Rejections leave the session untouched and are handed back to the
    /// submitter; nothing is rendered for them.
    fn process_event(&mut self, event: Event) -> Result<(), Rejected> {
        let result = match transition(&self.status, &self.history, event) {
            Ok(r) => r,
            Err(TransitionError::Rejected(rejected)) => {
                tracing::debug!(session_id = %self.session_id, reason = %rejected, "Submit rejected");
                return Err(rejected);
            }
            Err(e @ TransitionError::InvalidTransition(_)) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Dropping event");
                return Ok(());
            }
        };

        if result.new_status != self.status {
            tracing::debug!(
                session_id = %self.session_id,
                from = ?self.status,
                to = ?result.new_status,
                "Status change"
            );
        }
        self.status = result.new_status;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendTurn(turn) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    role = ?turn.role(),
                    bytes = turn.text().len(),
                    "Turn recorded"
                );
                self.history.push(turn);
            }
            Effect::Render(instruction) => {
                self.sink.render(instruction);
            }
            Effect::SendRequest(request) => {
                self.spawn_request(request);
            }
        }
    }

    /// Run the transport call as a background task; its outcome comes back
    /// through the completion channel
    fn spawn_request(&self, request: OutgoingRequest) {
        let transport = self.transport.clone();
        let completion_tx = self.completion_tx.clone();
        let session_id = self.session_id;

        tokio::spawn(async move {
            tracing::debug!(
                session_id = %session_id,
                history_len = request.history.len(),
                "Sending chat request (background)"
            );
            // A panicking transport still has to complete the request
            let call = tokio::spawn(async move { transport.send(&request).await });
            let result = match call.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(session_id = %session_id, error = %e, "Transport task failed");
                    Err(TransportError::network(format!("Transport task failed: {e}")))
                }
            };
            if completion_tx.send(result).await.is_err() {
                tracing::warn!(session_id = %session_id, "Session gone before reply arrived");
            }
        });
    }
}
