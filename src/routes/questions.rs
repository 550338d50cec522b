//! Quiz route handlers
//!
//! Authenticated endpoints for listing test types and subjects and
//! generating questionnaires.

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::extract::Query;
use serde::Deserialize;
use tracing::debug;

use crate::auth::Principal;
use crate::error::ApiResult;
use crate::questions::{build_questionnaire, verify_use, Questionnaire};
use crate::state::SharedState;

// ============================================
// Request Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct UseQuery {
    /// Test type to filter on
    #[serde(rename = "use")]
    pub use_: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionnaireQuery {
    #[serde(rename = "use")]
    pub use_: String,
    /// Repeated query parameter: one entry per requested subject
    #[serde(default)]
    pub subject: Vec<String>,
    pub nb_questions: usize,
}

// ============================================
// Route Handlers
// ============================================

/// GET /uses
///
/// List all test types in the store.
pub async fn list_uses(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<String>>> {
    debug!(user = %principal.username, "listing uses");
    Ok(Json(state.questions.list_uses().await))
}

/// GET /subjects?use=X
///
/// List the subjects available for a test type.
pub async fn list_subjects(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<UseQuery>,
) -> ApiResult<Json<Vec<String>>> {
    verify_use(state.questions.as_ref(), &query.use_).await?;

    debug!(user = %principal.username, use_ = %query.use_, "listing subjects");
    Ok(Json(state.questions.list_subjects(&query.use_).await))
}

/// GET /questions?use=X&subject=a&subject=b&nb_questions=N
///
/// Generate a randomized questionnaire.
pub async fn generate_questionnaire(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<QuestionnaireQuery>,
) -> ApiResult<Json<Questionnaire>> {
    let questionnaire = build_questionnaire(
        state.questions.as_ref(),
        &query.use_,
        &query.subject,
        query.nb_questions,
    )
    .await?;

    debug!(
        user = %principal.username,
        use_ = %query.use_,
        questions = questionnaire.len(),
        "questionnaire generated"
    );

    Ok(Json(questionnaire))
}
