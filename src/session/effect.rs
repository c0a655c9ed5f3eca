//! Effects produced by state transitions

use crate::protocol::OutgoingRequest;
use crate::render::RenderInstruction;
use crate::session::state::Turn;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Record a canonical turn in the history
    AppendTurn(Turn),

    /// Hand an instruction to the render sink
    Render(RenderInstruction),

    /// Start the transport call (runs in the background)
    SendRequest(OutgoingRequest),
}

impl Effect {
    pub fn show_pending() -> Self {
        Effect::Render(RenderInstruction::ShowPending)
    }

    pub fn hide_pending() -> Self {
        Effect::Render(RenderInstruction::HidePending)
    }

    pub fn render_all(instructions: impl IntoIterator<Item = RenderInstruction>) -> Vec<Self> {
        instructions.into_iter().map(Effect::Render).collect()
    }
}
