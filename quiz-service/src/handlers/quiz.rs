use crate::quiz::{self, PromptConfiguration, QuizResponse, DIAGNOSTIC_PATH};
use crate::services::metrics::record_quiz;
use crate::AppState;
use axum::{extract::State, routing::any, routing::MethodRouter, Json};
use service_core::error::AppError;

/// Serve one quiz variant. The request body and query are ignored.
pub async fn quiz(
    State(state): State<AppState>,
    variant: &'static PromptConfiguration,
) -> Result<Json<QuizResponse>, AppError> {
    match quiz::run_quiz(&state, variant).await {
        Ok(response) => {
            record_quiz(variant.path, "ok");
            Ok(Json(response))
        }
        Err(e) => {
            record_quiz(variant.path, e.outcome());
            Err(e.into())
        }
    }
}

/// Route for `variant`, answering any method.
pub fn quiz_route(variant: &'static PromptConfiguration) -> MethodRouter<AppState> {
    any(move |state: State<AppState>| quiz(state, variant))
}

/// Diagnostic: card name and image URL without a model call.
pub async fn scryfall_check(State(state): State<AppState>) -> Result<Json<QuizResponse>, AppError> {
    match quiz::run_lookup(&state).await {
        Ok(response) => {
            record_quiz(DIAGNOSTIC_PATH, "ok");
            Ok(Json(response))
        }
        Err(e) => {
            record_quiz(DIAGNOSTIC_PATH, e.outcome());
            Err(e.into())
        }
    }
}
