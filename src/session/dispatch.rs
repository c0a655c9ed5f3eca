//! Reply kind dispatch
//!
//! Maps a backend reply onto render instructions plus the text (if any) that
//! becomes the bot's turn in the history.

use crate::protocol::IncomingReply;
use crate::render::RenderInstruction;
use crate::session::state::Role;

/// Shown for every transport failure; internal detail is only logged
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, something went wrong. Please try again later.";

/// Outcome of dispatching a reply
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub instructions: Vec<RenderInstruction>,
    /// Text recorded as the bot turn; `None` keeps the reply out of history
    pub history_message: Option<String>,
}

/// Pure mapping from reply kind to display and history
///
/// `order` replies carry no backend-authored text, so they are rendered but
/// not recorded. `error` replies are display-only.
pub fn dispatch(reply: IncomingReply) -> Dispatch {
    match reply {
        IncomingReply::Chat { message } | IncomingReply::OrderRequest { message } => Dispatch {
            instructions: vec![RenderInstruction::message(Role::Bot, message.clone())],
            history_message: Some(message),
        },
        IncomingReply::Product { message, products } => Dispatch {
            instructions: vec![
                RenderInstruction::message(Role::Bot, message.clone()),
                RenderInstruction::ProductList { products },
            ],
            history_message: Some(message),
        },
        IncomingReply::Order { order_details } => Dispatch {
            instructions: vec![RenderInstruction::OrderDetails {
                status: order_details.status,
                tracking_number: order_details.tracking_number,
            }],
            history_message: None,
        },
        IncomingReply::Error { message } => Dispatch {
            instructions: vec![RenderInstruction::Error { text: message }],
            history_message: None,
        },
    }
}

/// Instructions for a failed transport call
pub(crate) fn dispatch_failure() -> Vec<RenderInstruction> {
    vec![RenderInstruction::Error {
        text: GENERIC_ERROR_MESSAGE.to_string(),
    }]
}
