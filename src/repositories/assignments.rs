use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Assignment;
use crate::db::types::AssignmentStatus;
use crate::services::records::{GeneratedQuestion, ResponseRecord};

pub(crate) const COLUMNS: &str = "\
    id, title, subject, grade_level, questions, responses, score, status, student_id, \
    created_at, updated_at";

pub(crate) struct CreateAssignment<'a> {
    pub(crate) title: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) grade_level: &'a str,
    pub(crate) questions: &'a [GeneratedQuestion],
    pub(crate) student_id: Option<i64>,
    pub(crate) now: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            title, subject, grade_level, questions, status, student_id, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.subject)
    .bind(params.grade_level)
    .bind(Json(params.questions))
    .bind(AssignmentStatus::NotStarted)
    .bind(params.student_id)
    .bind(params.now)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: i64,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {COLUMNS} FROM assignments WHERE student_id = $1 ORDER BY id"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct RecordSubmission<'a> {
    pub(crate) id: i64,
    pub(crate) responses: &'a [ResponseRecord],
    pub(crate) score: f64,
    pub(crate) now: PrimitiveDateTime,
}

/// Stores graded responses and the score, and marks the assignment completed.
/// Returns `None` when the assignment no longer exists.
pub(crate) async fn record_submission(
    pool: &PgPool,
    params: RecordSubmission<'_>,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "UPDATE assignments
         SET responses = $1,
             score = $2,
             status = $3,
             updated_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}"
    ))
    .bind(Json(params.responses))
    .bind(params.score)
    .bind(AssignmentStatus::Completed)
    .bind(params.now)
    .bind(params.id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Removes every assignment together with its student links.
pub(crate) async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM student_assignments").execute(&mut *tx).await?;
    let result = sqlx::query("DELETE FROM assignments").execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}
