use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::StudentProgress;
use crate::services::records::ResponseRecord;

const COLUMNS: &str = "\
    id, student_id, subject, grade_level, question, correct_answer, user_answer, is_correct, \
    created_at";

pub(crate) struct SaveResponses<'a> {
    pub(crate) student_id: Option<i64>,
    pub(crate) subject: &'a str,
    pub(crate) grade_level: &'a str,
    pub(crate) responses: &'a [ResponseRecord],
    pub(crate) now: PrimitiveDateTime,
}

/// Inserts all responses in one transaction.
pub(crate) async fn save_responses(
    pool: &PgPool,
    params: SaveResponses<'_>,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for response in params.responses {
        sqlx::query(
            "INSERT INTO student_progress (
                student_id, subject, grade_level, question, correct_answer, user_answer,
                is_correct, created_at
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
        )
        .bind(params.student_id)
        .bind(params.subject)
        .bind(params.grade_level)
        .bind(&response.question)
        .bind(&response.correct_answer)
        .bind(&response.user_answer)
        .bind(response.is_correct)
        .bind(params.now)
        .execute(&mut *tx)
        .await?;
        inserted += 1;
    }

    tx.commit().await?;
    Ok(inserted)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ProgressFilter {
    pub(crate) student_id: Option<i64>,
    pub(crate) subject: Option<String>,
}

/// Stored responses matching `filter`, oldest first.
pub(crate) async fn list_responses(
    pool: &PgPool,
    filter: &ProgressFilter,
) -> Result<Vec<StudentProgress>, sqlx::Error> {
    sqlx::query_as::<_, StudentProgress>(&format!(
        "SELECT {COLUMNS}
         FROM student_progress
         WHERE ($1::BIGINT IS NULL OR student_id = $1)
           AND ($2::TEXT IS NULL OR subject = $2)
         ORDER BY id"
    ))
    .bind(filter.student_id)
    .bind(filter.subject.as_deref())
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM student_progress").execute(pool).await?;
    Ok(result.rows_affected())
}
