//! HTTP route handlers.
//!
//! Three endpoints: quiz data, answer grading + feedback, and the final
//! session summary. All errors are returned as JSON bodies with an
//! `error` field; internals are logged, never leaked to the client.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use quizcoach_core::history::new_session_id;
use quizcoach_core::model::{
    AnswerRequest, Correctness, Feedback, FinalFeedback, MessageDetails, QuizData,
};
use quizcoach_core::CoreError;

use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn invalid_input() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "Invalid input"})),
    )
}

/// `GET /api/data` — serve the quiz questions.
///
/// The file is re-read and validated per request; a file that no longer
/// parses is a 500 with a generic message.
pub async fn get_data(State(state): State<AppState>) -> Result<Json<QuizData>, ApiError> {
    let content = std::fs::read_to_string(&state.quiz_path).map_err(|e| {
        error!(path = %state.quiz_path.display(), error = %e, "failed to read quiz data");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Invalid data"})),
        )
    })?;

    let data: QuizData = serde_json::from_str(&content).map_err(|e| {
        error!(path = %state.quiz_path.display(), error = %e, "quiz data failed validation");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Invalid data"})),
        )
    })?;

    Ok(Json(data))
}

/// `POST /api/handler` — grade a submission and generate feedback.
pub async fn submit_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<Feedback>, ApiError> {
    if request.answers.is_empty() {
        warn!(question = %request.question, "received an empty answer list");
        return Err(invalid_input());
    }

    let comparison = state
        .answer_key
        .compare(&request.question, &request.answers)
        .map_err(|e| {
            warn!(question = %request.question, error = %e, "question not in answer key");
            invalid_input()
        })?;

    // start=true issues a fresh session; otherwise the client's echoed id
    // is reused. A missing id degrades to a fresh (empty) session.
    let session_id = if request.start {
        state.generator.start_session()
    } else {
        request.session_id.clone().unwrap_or_else(new_session_id)
    };

    let details = MessageDetails {
        question: request.question.clone(),
        correctness: if comparison.is_match {
            Correctness::Correct
        } else {
            Correctness::Incorrect
        },
        correct_answers: comparison.canonical.clone(),
        answers: request.answers.clone(),
    };

    match state.generator.generate(&session_id, &details).await {
        Ok(feedback) => {
            info!(
                session_id = %session_id,
                question = %request.question,
                is_correct = comparison.is_match,
                "feedback generated"
            );
            Ok(Json(Feedback {
                feedback,
                is_correct: comparison.is_match,
                session_id,
            }))
        }
        Err(e) => {
            error!(
                session_id = %session_id,
                question = %request.question,
                error = %e,
                "feedback generation failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string(), "isCorrect": comparison.is_match})),
            ))
        }
    }
}

#[derive(Deserialize)]
pub struct FinalParams {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// `GET /api/final?sessionId=...` — terminal session summary.
pub async fn final_feedback(
    State(state): State<AppState>,
    Query(params): Query<FinalParams>,
) -> Result<Json<FinalFeedback>, ApiError> {
    let Some(session_id) = params.session_id else {
        warn!("final feedback requested without a session id");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Unknown session"})),
        ));
    };

    match state.generator.generate_final(&session_id).await {
        Ok(feedback) => {
            info!(session_id = %session_id, "final feedback generated");
            Ok(Json(FinalFeedback { feedback }))
        }
        Err(CoreError::EmptySession) => {
            warn!(session_id = %session_id, "final feedback requested for empty session");
            Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Unknown session"})),
            ))
        }
        Err(e) => {
            error!(session_id = %session_id, error = %e, "final feedback generation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            ))
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/api/handler", post(submit_answer))
        .route("/api/final", get(final_feedback))
        .with_state(state)
}
