use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::errors::AppError;
use crate::handlers::{AnalysisHandler, ChatHandler};
use crate::models::{AnalyzeMealRequest, AnalyzeMealResponse, ChatRequest, ChatResponse};

pub struct AppState {
    pub analysis_handler: Arc<AnalysisHandler>,
    pub chat_handler: Arc<ChatHandler>,
}

pub fn create_router(
    analysis_handler: Arc<AnalysisHandler>,
    chat_handler: Arc<ChatHandler>,
    max_body_bytes: usize,
) -> Router {
    let state = Arc::new(AppState {
        analysis_handler,
        chat_handler,
    });

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/analyze-meal", post(analyze_meal_route))
        .route("/api/chat", post(chat_route))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn analyze_meal_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeMealRequest>,
) -> Result<Json<AnalyzeMealResponse>, AppError> {
    let response = state.analysis_handler.analyze_meal(&request).await?;
    Ok(Json(response))
}

async fn chat_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = state.chat_handler.handle_chat(&request).await?;
    Ok(Json(response))
}

async fn root_handler() -> &'static str {
    "Meal Vision Backend - POST /api/analyze-meal or /api/chat"
}

async fn health_check() -> &'static str {
    "OK"
}
