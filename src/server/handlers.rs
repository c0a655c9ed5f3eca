//! HTTP request handlers

use super::intent::{build_prompt, classify, Intent, PromptTurn};
use super::{AssistantError, AppState};
use crate::protocol::IncomingReply;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const PRODUCTS_MESSAGE: &str = "Here are some products from our store:";
const ORDER_PROMPT_MESSAGE: &str = "To check your order status, please provide your order number.";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    message: Option<String>,
    #[serde(default)]
    history: Vec<PromptTurn>,
}

async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<IncomingReply>, AppError> {
    let Some(assistant) = state.assistant.clone() else {
        return Err(AppError::NotConfigured);
    };

    let request: ChatBody = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Unreadable chat body");
        AppError::NoMessage
    })?;
    let message = request.message.ok_or(AppError::NoMessage)?;

    let intent = classify(&message);
    tracing::info!(?intent, history_len = request.history.len(), "Chat request");

    match intent {
        Intent::Products => {
            let products = state.catalog.products().await.map_err(|e| {
                tracing::error!(error = %e, "Catalog fetch failed");
                AppError::CatalogUnavailable
            })?;
            if products.is_empty() {
                return Err(AppError::CatalogUnavailable);
            }
            Ok(Json(IncomingReply::Product {
                message: PRODUCTS_MESSAGE.to_string(),
                products,
            }))
        }
        Intent::OrderStatus => Ok(Json(IncomingReply::OrderRequest {
            message: ORDER_PROMPT_MESSAGE.to_string(),
        })),
        Intent::Conversation => {
            let prompt = build_prompt(&request.history, &message);
            match assistant.generate(&prompt).await {
                Ok(text) => Ok(Json(IncomingReply::chat(text))),
                Err(AssistantError::Blocked(reason)) => {
                    tracing::warn!(reason = %reason, "Prompt blocked");
                    Err(AppError::Blocked)
                }
                Err(e @ AssistantError::Failed(_)) => {
                    tracing::error!(error = %e, "Assistant failed");
                    Err(AppError::AssistantUnavailable)
                }
            }
        }
    }
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    NotConfigured,
    NoMessage,
    CatalogUnavailable,
    Blocked,
    AssistantUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotConfigured => (StatusCode::INTERNAL_SERVER_ERROR, "API key not configured"),
            AppError::NoMessage => (StatusCode::BAD_REQUEST, "No message provided"),
            AppError::CatalogUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unable to fetch product data at the moment.",
            ),
            AppError::Blocked => (
                StatusCode::BAD_REQUEST,
                "I apologize, but I cannot provide a response to that query. Please try rephrasing your question.",
            ),
            AppError::AssistantUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "I'm having trouble generating a response. Please try again in a moment.",
            ),
        };

        (status, Json(IncomingReply::error(message))).into_response()
    }
}
