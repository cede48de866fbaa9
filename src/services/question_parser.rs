//! Line-oriented reader for question-generation completions.
//!
//! Expected shape, repeated per question (blank lines anywhere are ignored):
//!
//! ```text
//! Question: <question text>
//! Options: "<option1>", "<option2>", "<option3>", "<option4>"
//! Correct answer: "<correct_option>"
//! ```
//!
//! A question is emitted only when its `Correct answer:` line arrives. Any other
//! non-marker line opens a new question and drops whatever was still open.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::services::records::GeneratedQuestion;

const OPTIONS_MARKER: &str = "Options:";
const ANSWER_MARKER: &str = "Correct answer:";
const QUESTION_PREFIX: &str = "Question: ";
const OPTION_SEPARATOR: &str = "\", \"";

/// Opt-in checks on top of the default lenient reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ParserOptions {
    /// Fail instead of dropping a question that never got a correct answer.
    pub(crate) strict: bool,
    /// Fail when a correct answer is not one of the parsed options.
    pub(crate) require_answer_in_options: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum QuestionParseError {
    #[error("question {question:?} has no correct answer")]
    IncompleteQuestion { question: String },
    #[error("correct answer {answer:?} of question {question:?} is not among its options")]
    AnswerNotInOptions { question: String, answer: String },
}

#[derive(Debug)]
struct OpenQuestion {
    text: String,
    options: Vec<String>,
}

#[derive(Debug)]
enum ParserState {
    AwaitingQuestion,
    InQuestion(OpenQuestion),
}

/// Lenient parse: malformed or truncated input yields fewer questions, never an error.
pub(crate) fn parse_questions<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> Vec<GeneratedQuestion> {
    let mut questions = Vec::new();
    let mut state = ParserState::AwaitingQuestion;

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        state = match (state, classify(line)) {
            (ParserState::InQuestion(mut open), Line::Options(rest)) => {
                open.options = split_options(rest);
                open.options.shuffle(rng);
                ParserState::InQuestion(open)
            }
            (ParserState::InQuestion(open), Line::Answer(rest)) => {
                questions.push(GeneratedQuestion {
                    question: open.text,
                    options: open.options,
                    correct_answer: strip_quotes(rest).to_string(),
                });
                ParserState::AwaitingQuestion
            }
            (ParserState::AwaitingQuestion, Line::Options(_) | Line::Answer(_)) => {
                ParserState::AwaitingQuestion
            }
            (previous, Line::Text(text)) => {
                if let ParserState::InQuestion(dropped) = previous {
                    tracing::debug!(question = %dropped.text, "Dropping question without correct answer");
                }
                ParserState::InQuestion(OpenQuestion {
                    text: strip_question_prefix(text).to_string(),
                    options: Vec::new(),
                })
            }
        };
    }

    if let ParserState::InQuestion(dropped) = state {
        tracing::debug!(question = %dropped.text, "Dropping trailing question without correct answer");
    }

    questions
}

/// Parse with the opt-in checks of `options` applied. With both checks off this
/// is exactly `parse_questions`.
pub(crate) fn parse_questions_with<R: Rng + ?Sized>(
    raw: &str,
    rng: &mut R,
    options: ParserOptions,
) -> Result<Vec<GeneratedQuestion>, QuestionParseError> {
    if options.strict {
        if let Some(question) = first_incomplete_question(raw) {
            return Err(QuestionParseError::IncompleteQuestion { question });
        }
    }

    let questions = parse_questions(raw, rng);

    if options.require_answer_in_options {
        if let Some(stray) = questions.iter().find(|question| !question.answer_in_options()) {
            return Err(QuestionParseError::AnswerNotInOptions {
                question: stray.question.clone(),
                answer: stray.correct_answer.clone(),
            });
        }
    }

    Ok(questions)
}

enum Line<'a> {
    Options(&'a str),
    Answer(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(OPTIONS_MARKER) {
        Line::Options(rest)
    } else if let Some(rest) = line.strip_prefix(ANSWER_MARKER) {
        Line::Answer(rest)
    } else {
        Line::Text(line)
    }
}

fn split_options(rest: &str) -> Vec<String> {
    rest.split(OPTION_SEPARATOR)
        .map(strip_quotes)
        .map(ToOwned::to_owned)
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches('"')
}

fn strip_question_prefix(line: &str) -> &str {
    line.strip_prefix(QUESTION_PREFIX).unwrap_or(line)
}

/// Text of the first question the lenient parse would drop, if any.
fn first_incomplete_question(raw: &str) -> Option<String> {
    let mut open: Option<&str> = None;

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match classify(line) {
            Line::Options(_) => {}
            Line::Answer(_) => open = None,
            Line::Text(text) => {
                if let Some(previous) = open {
                    return Some(strip_question_prefix(previous).to_string());
                }
                open = Some(text);
            }
        }
    }

    open.map(|text| strip_question_prefix(text).to_string())
}
