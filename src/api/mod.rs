pub(crate) mod assignments;
pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod progress;
pub(crate) mod questions;
pub(crate) mod router;
pub(crate) mod students;
pub(crate) mod validation;
