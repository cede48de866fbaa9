use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::services::summary::SubjectAggregate;

pub(crate) const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const SUMMARY_PREAMBLE: &str = "Summarize the following student responses and provide areas of improvement based on the incorrect answers. Only include suggestions for improvement.\n";

const SUMMARY_INSTRUCTIONS: &str = "\nFor each subject, provide bullet points of strengths and areas of improvement in the following format:\n\nStrengths:\n[Strength #1]\n[Strength #2]\n[etc.]\n\nAreas of Improvement:\n[Area of Improvement #1]\n[Area of Improvement #2]\n[etc.]\n";

/// Request for `count` questions in the line format `question_parser` reads.
/// `count` must already be validated as positive.
pub(crate) fn build_question_prompt(subject: &str, grade_level: &str, count: u32) -> String {
    format!(
        "Generate {count} multiple-choice questions for {subject} for grade level {grade_level} based on the California curriculum. Each question should have exactly 4 options, each option enclosed in double quotation marks. The correct answer should be indicated clearly at the end of each question. The format should be:\nQuestion: <question text>\nOptions: \"<option1>\", \"<option2>\", \"<option3>\", \"<option4>\"\nCorrect answer: \"<correct_option>\"\nEnsure the options are listed without any prefixes like A), B), etc."
    )
}

/// One `Subject:` header per aggregate followed by one line per response,
/// then the strengths / areas of improvement instructions.
pub(crate) fn build_summary_prompt(aggregates: &BTreeMap<String, SubjectAggregate>) -> String {
    let mut prompt = String::from(SUMMARY_PREAMBLE);

    for (subject, aggregate) in aggregates {
        let _ = writeln!(prompt, "Subject: {subject}");
        for response in &aggregate.responses {
            let _ = writeln!(
                prompt,
                "Question: {}, Correct Answer: {}, User Answer: {}, Correct: {}",
                response.question,
                response.correct_answer,
                response.user_answer,
                if response.is_correct { "True" } else { "False" }
            );
        }
    }

    prompt.push_str(SUMMARY_INSTRUCTIONS);
    prompt
}
