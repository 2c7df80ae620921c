use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::ApiError;
use crate::models::{QueryRequest, QueryResponse};
use crate::state::AppState;

const MAX_QUESTION_CHARS: usize = 500;
const MIN_QUESTION_CHARS: usize = 5;

/// POST /query - Answer a question from the indexed documentation:
///   1. Validate the question
///   2. Retrieve chunks (similarity search + MMR)
///   3. Generate an answer grounded on those chunks
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::unprocessable(rejection.body_text()))?;
    validate_question(&req.question)?;

    if !state.has_documents() {
        tracing::error!("No documents available for retrieval.");
        return Err(ApiError::internal("Document index is empty."));
    }

    match state.chain.invoke(&req.question).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Unhandled error during RAG query: {e:#}");
            Err(ApiError::internal(
                "Internal server error during RAG query.",
            ))
        }
    }
}

fn validate_question(question: &str) -> Result<(), ApiError> {
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(ApiError::unprocessable(format!(
            "String should have at most {MAX_QUESTION_CHARS} characters"
        )));
    }
    if question.trim().chars().count() < MIN_QUESTION_CHARS {
        return Err(ApiError::unprocessable("Please write a longer question."));
    }
    Ok(())
}
