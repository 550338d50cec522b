//! Admin route handlers
//!
//! Role-guarded endpoint for appending questions to the store.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::auth::Principal;
use crate::error::{ApiResult, AppError};
use crate::questions::Question;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedQuestionResponse {
    pub status: String,
    pub created_item: Question,
}

/// POST /admin
///
/// Append a new question to the store. Requires the admin scope and the
/// admin role.
pub async fn add_question(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Json(question): Json<Question>,
) -> ApiResult<(StatusCode, Json<CreatedQuestionResponse>)> {
    question
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state.questions.append(question.clone()).await?;

    info!(
        user = %principal.username,
        subject = %question.subject,
        use_ = %question.use_,
        "question added to the store"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedQuestionResponse {
            status: "The new question was created".to_string(),
            created_item: question,
        }),
    ))
}
