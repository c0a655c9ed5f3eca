//! Keyword intent routing and prompt assembly

use serde::Deserialize;

const PRODUCT_KEYWORDS: &[&str] = &["product", "item", "price", "stock", "available"];
const ORDER_KEYWORDS: &[&str] = &["order", "tracking", "shipping", "delivery"];

/// Turns of prior context the assistant sees
pub const PROMPT_HISTORY_TURNS: usize = 5;

const PREAMBLE: &str = "You are a helpful e-commerce customer service assistant. \
Be friendly, concise, and professional. If you're not sure about something, ask for \
clarification. Focus on helping customers with their shopping experience.\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Products,
    OrderStatus,
    Conversation,
}

/// Substring match on the lower-cased message; product keywords win
pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if mentions(PRODUCT_KEYWORDS) {
        Intent::Products
    } else if mentions(ORDER_KEYWORDS) {
        Intent::OrderStatus
    } else {
        Intent::Conversation
    }
}

/// History entry as sent by clients
///
/// Anything other than `user` is treated as the assistant's side.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptTurn {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

pub fn build_prompt(history: &[PromptTurn], message: &str) -> String {
    let mut prompt = String::from(PREAMBLE);

    let recent = &history[history.len().saturating_sub(PROMPT_HISTORY_TURNS)..];
    for turn in recent {
        let speaker = if turn.kind == "user" { "User" } else { "Assistant" };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&turn.message);
        prompt.push('\n');
    }

    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push_str("\nAssistant: ");
    prompt
}
