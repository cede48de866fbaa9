use axum::{extract::State, routing::post, Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::errors::ApiError;
use crate::api::validation::{require_text, validate_payload};
use crate::core::state::AppState;
use crate::schemas::question::{GenerateQuestionsRequest, GenerateQuestionsResponse};
use crate::services::generation::{self, QuestionSpec};
use crate::services::question_parser::ParserOptions;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/generate_questions", post(generate_questions))
}

async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, ApiError> {
    validate_payload(&payload)?;

    let ai = state.settings().ai();
    if payload.num_questions > ai.max_questions_per_request {
        return Err(ApiError::BadRequest(format!(
            "num_questions must not exceed {}",
            ai.max_questions_per_request
        )));
    }

    let spec = QuestionSpec {
        subject: require_text("subject", &payload.subject)?,
        grade_level: require_text("grade_level", &payload.grade_level)?,
        count: payload.num_questions,
    };
    let options = ParserOptions {
        strict: ai.parser_strict,
        require_answer_in_options: ai.parser_validate_answers,
    };

    let mut rng = StdRng::from_entropy();
    let questions =
        generation::generate_questions(state.completion(), &spec, options, &mut rng).await?;

    Ok(Json(GenerateQuestionsResponse { questions }))
}
