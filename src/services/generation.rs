use rand::Rng;
use thiserror::Error;

use crate::core::metrics::QUESTION_SHORTFALL_TOTAL;
use crate::services::completion::{CompletionError, TextCompletion};
use crate::services::prompts::build_question_prompt;
use crate::services::question_parser::{parse_questions_with, ParserOptions, QuestionParseError};
use crate::services::records::GeneratedQuestion;

/// What to ask the model for. `count` is validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuestionSpec {
    pub(crate) subject: String,
    pub(crate) grade_level: String,
    pub(crate) count: u32,
}

#[derive(Debug, Error)]
pub(crate) enum GenerationError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Parse(#[from] QuestionParseError),
}

/// Prompt, one completion call, then parse. Returning fewer questions than
/// requested is not an error; it is logged and counted.
pub(crate) async fn generate_questions<R>(
    completion: &dyn TextCompletion,
    spec: &QuestionSpec,
    options: ParserOptions,
    rng: &mut R,
) -> Result<Vec<GeneratedQuestion>, GenerationError>
where
    R: Rng + Send + ?Sized,
{
    let prompt = build_question_prompt(&spec.subject, &spec.grade_level, spec.count);
    tracing::info!(
        subject = %spec.subject,
        grade_level = %spec.grade_level,
        count = spec.count,
        "Generating questions"
    );

    let raw = completion.complete(&prompt).await?;
    let questions = parse_questions_with(&raw, rng, options)?;

    if questions.len() < spec.count as usize {
        metrics::counter!(QUESTION_SHORTFALL_TOTAL).increment(1);
        tracing::warn!(
            requested = spec.count,
            parsed = questions.len(),
            "Completion yielded fewer questions than requested"
        );
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::services::completion::testing::ScriptedCompletion;

    const TWO_QUESTIONS: &str = "Question: What is 9 - 4?\nOptions: \"3\", \"4\", \"5\", \"6\"\nCorrect answer: \"5\"\n\nQuestion: What is 12 / 3?\nOptions: \"3\", \"4\", \"6\", \"9\"\nCorrect answer: \"4\"\n";

    fn spec(count: u32) -> QuestionSpec {
        QuestionSpec { subject: "Math".into(), grade_level: "5th".into(), count }
    }

    #[tokio::test]
    async fn generates_questions_from_completion() {
        let completion = ScriptedCompletion::replying([TWO_QUESTIONS]);
        let mut rng = StdRng::seed_from_u64(1);

        let questions =
            generate_questions(&completion, &spec(2), ParserOptions::default(), &mut rng)
                .await
                .expect("questions");

        assert_eq!(questions.len(), 2);
        let options: BTreeSet<_> = questions[0].options.iter().map(String::as_str).collect();
        assert_eq!(options, BTreeSet::from(["3", "4", "5", "6"]));
        assert_eq!(questions[1].correct_answer, "4");

        let prompts = completion.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0]
            .starts_with("Generate 2 multiple-choice questions for Math for grade level 5th"));
    }

    #[tokio::test]
    async fn short_completion_is_not_an_error() {
        let completion = ScriptedCompletion::replying([TWO_QUESTIONS]);
        let mut rng = StdRng::seed_from_u64(2);

        let questions =
            generate_questions(&completion, &spec(5), ParserOptions::default(), &mut rng)
                .await
                .expect("questions");

        assert_eq!(questions.len(), 2);
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        let completion = ScriptedCompletion::failing("Incorrect API key provided");
        let mut rng = StdRng::seed_from_u64(3);

        let err = generate_questions(&completion, &spec(1), ParserOptions::default(), &mut rng)
            .await
            .unwrap_err();

        match err {
            GenerationError::Completion(CompletionError::Upstream { message, .. }) => {
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn strict_options_surface_parse_errors() {
        let completion = ScriptedCompletion::replying(["Question: Cut off\nOptions: \"a\", \"b\""]);
        let mut rng = StdRng::seed_from_u64(4);
        let options = ParserOptions { strict: true, ..ParserOptions::default() };

        let err = generate_questions(&completion, &spec(1), options, &mut rng).await.unwrap_err();

        assert!(matches!(err, GenerationError::Parse(QuestionParseError::IncompleteQuestion { .. })));
    }
}
