//! Pure state transition function

use super::dispatch::{dispatch, dispatch_failure};
use super::{Effect, Event, History, SessionStatus, Turn};
use crate::protocol::OutgoingRequest;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_status: SessionStatus,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(status: SessionStatus) -> Self {
        Self {
            new_status: status,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Why a submit was not admitted
///
/// Neither case is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("A reply is still pending")]
    Busy,
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Rejected(#[from] Rejected),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs. The history is
/// read, never written; appends come back as [`Effect::AppendTurn`].
pub fn transition(
    status: &SessionStatus,
    history: &History,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (status, event) {
        // ============================================================
        // Submit
        // ============================================================

        // Idle + Submit -> AwaitingReply
        (SessionStatus::Idle, Event::Submit { text }) => {
            let message = text.trim();
            if message.is_empty() {
                return Err(Rejected::EmptyMessage.into());
            }

            // History goes out as prior context; the new turn travels as `message`
            let request = OutgoingRequest::new(message, history.snapshot());

            Ok(TransitionResult::new(SessionStatus::AwaitingReply)
                .with_effect(Effect::AppendTurn(Turn::user(message)))
                .with_effect(Effect::show_pending())
                .with_effect(Effect::SendRequest(request)))
        }

        // AwaitingReply + Submit -> reject, nothing changes
        (SessionStatus::AwaitingReply, Event::Submit { .. }) => Err(Rejected::Busy.into()),

        // ============================================================
        // Transport completion
        // ============================================================

        // AwaitingReply + ReplyReceived -> Idle
        (SessionStatus::AwaitingReply, Event::ReplyReceived { reply }) => {
            let dispatched = dispatch(reply);
            let record = dispatched
                .history_message
                .map(|message| Effect::AppendTurn(Turn::bot(message)));

            Ok(TransitionResult::new(SessionStatus::Idle)
                .with_effect(Effect::hide_pending())
                .with_effects(record)
                .with_effects(Effect::render_all(dispatched.instructions)))
        }

        // AwaitingReply + TransportFailed -> Idle, history untouched
        (SessionStatus::AwaitingReply, Event::TransportFailed { .. }) => {
            Ok(TransitionResult::new(SessionStatus::Idle)
                .with_effect(Effect::hide_pending())
                .with_effects(Effect::render_all(dispatch_failure())))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (status, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {status:?} with event {event:?}"
        ))),
    }
}
