use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Lifecycle of an assignment for the student it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "assignmentstatus", rename_all = "snake_case")]
pub(crate) enum AssignmentStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl AssignmentStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}
