pub(crate) mod assignments;
pub(crate) mod health;
pub(crate) mod progress;
pub(crate) mod student_assignments;
pub(crate) mod students;
