use std::collections::BTreeMap;

use thiserror::Error;

use crate::services::completion::{CompletionError, TextCompletion};
use crate::services::prompts::build_summary_prompt;
use crate::services::records::ResponseRecord;

/// Responses of one subject with their correct / incorrect tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SubjectAggregate {
    pub(crate) correct: usize,
    pub(crate) incorrect: usize,
    pub(crate) responses: Vec<ResponseRecord>,
}

impl SubjectAggregate {
    fn push(&mut self, record: ResponseRecord) {
        if record.is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.responses.push(record);
    }

    pub(crate) fn total(&self) -> usize {
        self.correct + self.incorrect
    }
}

#[derive(Debug, Error)]
pub(crate) enum SummaryError {
    #[error("no responses to summarize")]
    NoResponses,
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Groups records by subject. Within a subject the input order is kept;
/// subjects themselves come out sorted by name.
pub(crate) fn aggregate(
    records: impl IntoIterator<Item = (String, ResponseRecord)>,
) -> BTreeMap<String, SubjectAggregate> {
    let mut aggregates = BTreeMap::<String, SubjectAggregate>::new();
    for (subject, record) in records {
        aggregates.entry(subject).or_default().push(record);
    }
    aggregates
}

/// Asks the completion service for a strengths / areas of improvement write-up.
/// Empty input is refused before any outbound call is made.
pub(crate) async fn generate_summary(
    completion: &dyn TextCompletion,
    records: Vec<(String, ResponseRecord)>,
) -> Result<String, SummaryError> {
    let aggregates = aggregate(records);
    if aggregates.is_empty() {
        return Err(SummaryError::NoResponses);
    }

    let prompt = build_summary_prompt(&aggregates);
    tracing::info!(
        subjects = aggregates.len(),
        responses = aggregates.values().map(SubjectAggregate::total).sum::<usize>(),
        "Requesting progress summary"
    );
    tracing::debug!(prompt = %prompt, "Summary prompt");

    let summary = completion.complete(&prompt).await?;
    Ok(summary)
}
