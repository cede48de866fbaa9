pub(crate) mod completion;
pub(crate) mod generation;
pub(crate) mod prompts;
pub(crate) mod question_parser;
pub(crate) mod records;
pub(crate) mod scoring;
pub(crate) mod summary;
