//! # REST API for Chat Commands
//!
//! The chat front end posts structured commands here and shows the reply text as is.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use shared::ChatCommandRequest;
use tracing::info;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(handle_chat_command))
}

/// Always 200: failures are part of the reply text
pub async fn handle_chat_command(
    State(state): State<AppState>,
    Json(request): Json<ChatCommandRequest>,
) -> impl IntoResponse {
    info!("POST /api/chat - request: {:?}", request);

    let response = state.chat_service.handle(request).await;
    (StatusCode::OK, Json(response))
}
