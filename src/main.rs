//! Storefront chat - conversational session client and reference backend
//!
//! `storefront-chat chat` (the default) runs an interactive session in the
//! terminal; `storefront-chat serve` runs the chat backend it talks to.

mod chat;
mod config;
mod protocol;
mod render;
mod runtime;
mod server;
mod session;
mod transport;

use config::{ClientConfig, ServerConfig};
use server::{
    create_router, AppState, Assistant, GeminiAssistant, LoggingAssistant, ProductCatalog,
    ShopifyCatalog, StaticCatalog,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upstream calls made by the backend (catalog, assistant)
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Chat,
    Serve,
}

impl Mode {
    fn parse(arg: Option<&str>) -> Result<Self, String> {
        match arg {
            None | Some("chat") => Ok(Mode::Chat),
            Some("serve") => Ok(Mode::Serve),
            Some(other) => Err(format!(
                "unknown mode {other:?}; usage: storefront-chat [chat|serve]"
            )),
        }
    }

    fn default_filter(self) -> &'static str {
        match self {
            Mode::Chat => "storefront_chat=warn",
            Mode::Serve => "storefront_chat=info,tower_http=debug",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arg = std::env::args().nth(1);
    let mode = Mode::parse(arg.as_deref())?;

    // Initialize logging (stderr keeps the chat transcript clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| mode.default_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match mode {
        Mode::Chat => {
            let config = ClientConfig::from_env()?;
            chat::run(&config).await?;
        }
        Mode::Serve => serve(ServerConfig::from_env()?).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog: Arc<dyn ProductCatalog> = match &config.shopify {
        Some(shopify) => {
            tracing::info!(shop = %shopify.shop_url, "Using Shopify catalog");
            Arc::new(ShopifyCatalog::new(shopify, UPSTREAM_TIMEOUT)?)
        }
        None => {
            tracing::warn!("SHOPIFY_SHOP_URL/SHOPIFY_ACCESS_TOKEN not set, using built-in catalog");
            Arc::new(StaticCatalog::default())
        }
    };

    let assistant: Option<Arc<dyn Assistant>> = match config.gemini_api_key {
        Some(api_key) => {
            let gemini = GeminiAssistant::new(api_key, &config.gemini_model, None, UPSTREAM_TIMEOUT)?;
            tracing::info!(model = %config.gemini_model, "Assistant initialized");
            Some(Arc::new(LoggingAssistant::new(gemini)))
        }
        None => {
            tracing::warn!("No assistant configured. Set GEMINI_API_KEY.");
            None
        }
    };

    let app = create_router(AppState::new(catalog, assistant));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Storefront chat backend listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
