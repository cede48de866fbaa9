use serde::Serialize;
use thiserror::Error;

use crate::services::records::SubmittedResponse;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct ScoreResult {
    pub(crate) correct: usize,
    pub(crate) total: usize,
    pub(crate) percentage: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScoringError {
    #[error("at least one response is required to compute a score")]
    NoResponses,
}

/// Exact-match scoring; `percentage` is `100 * correct / total`.
pub(crate) fn score(responses: &[SubmittedResponse]) -> Result<ScoreResult, ScoringError> {
    if responses.is_empty() {
        return Err(ScoringError::NoResponses);
    }

    let total = responses.len();
    let correct =
        responses.iter().filter(|response| response.user_answer == response.correct_answer).count();
    let percentage = correct as f64 / total as f64 * 100.0;

    Ok(ScoreResult { correct, total, percentage })
}
