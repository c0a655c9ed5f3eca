//! Wire types for the chat endpoint
//!
//! Request: `{ "message": ..., "history": [{ "type": "user"|"bot", "message": ... }] }`
//! Reply: `{ "type": ..., "message"?, "products"?, "order_details"? }`

use crate::session::Turn;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A single message sent to the backend, with prior context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingRequest {
    pub message: String,
    /// Turns exchanged before `message`, oldest first
    #[serde(default)]
    pub history: Vec<Turn>,
}

impl OutgoingRequest {
    pub fn new(message: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            message: message.into(),
            history,
        }
    }
}

/// A product line in a `product` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
}

impl Product {
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            price,
        }
    }
}

/// Order status carried by an `order` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

/// Structured reply from the backend, discriminated by `type`
///
/// Unrecognized (or missing) tags decode as [`IncomingReply::Chat`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawReply")]
pub enum IncomingReply {
    Chat {
        message: String,
    },
    Product {
        message: String,
        products: Vec<Product>,
    },
    OrderRequest {
        message: String,
    },
    Order {
        order_details: OrderDetails,
    },
    Error {
        message: String,
    },
}

impl IncomingReply {
    pub fn chat(message: impl Into<String>) -> Self {
        IncomingReply::Chat {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        IncomingReply::Error {
            message: message.into(),
        }
    }

    /// The kind tag as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            IncomingReply::Chat { .. } => "chat",
            IncomingReply::Product { .. } => "product",
            IncomingReply::OrderRequest { .. } => "order_request",
            IncomingReply::Order { .. } => "order",
            IncomingReply::Error { .. } => "error",
        }
    }
}

/// A reply whose tag was understood but whose shape was not
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{kind}` reply is missing `{field}`")]
pub struct ReplyShapeError {
    pub kind: String,
    pub field: &'static str,
}

/// Loose view of a reply body, before the tag is interpreted
#[derive(Debug, Deserialize)]
struct RawReply {
    /// Non-string tags are as unknown as unrecognized strings
    #[serde(rename = "type", default)]
    kind: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    products: Option<Vec<Product>>,
    #[serde(default)]
    order_details: Option<OrderDetails>,
}

impl TryFrom<RawReply> for IncomingReply {
    type Error = ReplyShapeError;

    fn try_from(raw: RawReply) -> Result<Self, ReplyShapeError> {
        let kind = raw
            .kind
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .unwrap_or("chat")
            .to_string();
        let missing = |field: &'static str| ReplyShapeError {
            kind: kind.clone(),
            field,
        };

        match kind.as_str() {
            "product" => Ok(IncomingReply::Product {
                message: raw.message.ok_or_else(|| missing("message"))?,
                products: raw.products.ok_or_else(|| missing("products"))?,
            }),
            "order_request" => Ok(IncomingReply::OrderRequest {
                message: raw.message.ok_or_else(|| missing("message"))?,
            }),
            "order" => Ok(IncomingReply::Order {
                order_details: raw.order_details.ok_or_else(|| missing("order_details"))?,
            }),
            "error" => Ok(IncomingReply::Error {
                message: raw.message.ok_or_else(|| missing("message"))?,
            }),
            // "chat" and anything we don't know yet
            _ => Ok(IncomingReply::Chat {
                message: raw.message.ok_or_else(|| missing("message"))?,
            }),
        }
    }
}

/// Prices arrive as numbers from most backends and as strings from Shopify
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(value) => Ok(value),
        Price::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {text:?}"))),
    }
}
