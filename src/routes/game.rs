use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::{state::AppState, utils::websocket};

pub fn routes(state: AppState) -> Router {
    Router::new()
        // curl http://localhost:3000/api/game/state
        .route("/state", get(get_game_state))
        // curl http://localhost:3000/api/game/chat
        .route("/chat", get(get_chat_log))
        // websocat ws://localhost:3000/api/game/ws
        .route("/ws", get(websocket::handler))
        .with_state(state)
}

async fn get_game_state(State(state): State<AppState>) -> impl IntoResponse {
    match state.game.snapshot().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Json(e.to_string())).into_response(),
    }
}

async fn get_chat_log(State(state): State<AppState>) -> impl IntoResponse {
    match state.game.chat_log().await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Json(e.to_string())).into_response(),
    }
}
