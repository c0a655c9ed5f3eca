//! Conversation session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition(status, history, event)` returns the next status and the
//! effects the runtime must carry out, in order.

mod dispatch;
mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

#[allow(unused_imports)] // Public API re-exports
pub use dispatch::{dispatch, Dispatch, GENERIC_ERROR_MESSAGE};
pub use effect::Effect;
pub use event::Event;
pub use state::{History, Role, SessionStatus, Turn};
#[allow(unused_imports)] // Public API re-exports
pub use transition::{transition, Rejected, TransitionError, TransitionResult};
