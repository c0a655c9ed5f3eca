//! Reference chat backend
//!
//! Speaks the same wire protocol the client consumes: keyword routing to the
//! product catalog or the order prompt, everything else to the assistant.

mod assistant;
mod catalog;
mod handlers;
mod intent;

pub use assistant::{Assistant, AssistantError, GeminiAssistant, LoggingAssistant};
pub use catalog::{CatalogError, ProductCatalog, ShopifyCatalog, StaticCatalog};
pub use handlers::create_router;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ProductCatalog>,
    /// `None` when no API key is configured; every chat request then fails
    pub assistant: Option<Arc<dyn Assistant>>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn ProductCatalog>, assistant: Option<Arc<dyn Assistant>>) -> Self {
        Self { catalog, assistant }
    }
}
