//! Render instructions and the sink that consumes them
//!
//! The session core only ever describes display updates; how they are drawn,
//! escaped and scrolled is up to the sink.

mod terminal;

pub use terminal::TerminalSink;

use crate::protocol::Product;
use crate::session::Role;

/// A display update produced by the session
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    /// A transcript message
    Message { role: Role, text: String },

    /// Products in backend order, drawn as one block
    ProductList { products: Vec<Product> },

    /// Order status card
    OrderDetails {
        status: String,
        tracking_number: Option<String>,
    },

    /// An error line (backend-declared or generic)
    Error { text: String },

    /// Show the transient "waiting for reply" indicator
    ShowPending,

    /// Remove the indicator
    HidePending,
}

impl RenderInstruction {
    pub fn message(role: Role, text: impl Into<String>) -> Self {
        RenderInstruction::Message {
            role,
            text: text.into(),
        }
    }
}

/// Consumer of render instructions
///
/// Instructions are fire-and-forget: a sink that fails to draw must not
/// report back into the session.
pub trait RenderSink: Send {
    fn render(&mut self, instruction: RenderInstruction);
}
