use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::StudentAssignment;
use crate::db::types::AssignmentStatus;

const COLUMNS: &str = "id, student_id, assignment_id, status, created_at";

/// Links the assignment to a student. Returns `None` when the link already exists.
pub(crate) async fn create_if_absent(
    pool: &PgPool,
    student_id: i64,
    assignment_id: i64,
    now: PrimitiveDateTime,
) -> Result<Option<StudentAssignment>, sqlx::Error> {
    sqlx::query_as::<_, StudentAssignment>(&format!(
        "INSERT INTO student_assignments (student_id, assignment_id, status, created_at)
         VALUES ($1,$2,$3,$4)
         ON CONFLICT (student_id, assignment_id) DO NOTHING
         RETURNING {COLUMNS}"
    ))
    .bind(student_id)
    .bind(assignment_id)
    .bind(AssignmentStatus::NotStarted)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_assignment(
    pool: &PgPool,
    assignment_id: i64,
) -> Result<Vec<StudentAssignment>, sqlx::Error> {
    sqlx::query_as::<_, StudentAssignment>(&format!(
        "SELECT {COLUMNS} FROM student_assignments WHERE assignment_id = $1 ORDER BY student_id"
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn exists(
    pool: &PgPool,
    student_id: i64,
    assignment_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT 1 FROM student_assignments WHERE student_id = $1 AND assignment_id = $2
         )",
    )
    .bind(student_id)
    .bind(assignment_id)
    .fetch_one(pool)
    .await
}

/// Updates the link status; returns how many links matched (0 or 1).
pub(crate) async fn set_status(
    pool: &PgPool,
    student_id: i64,
    assignment_id: i64,
    status: AssignmentStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE student_assignments SET status = $1 WHERE student_id = $2 AND assignment_id = $3",
    )
    .bind(status)
    .bind(student_id)
    .bind(assignment_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
