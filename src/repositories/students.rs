use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Student;

const COLUMNS: &str = "id, name, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    name: &str,
    created_at: PrimitiveDateTime,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (name, created_at) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students ORDER BY id"))
        .fetch_all(pool)
        .await
}

/// Subset of `ids` that belong to existing students.
pub(crate) async fn existing_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_scalar::<_, i64>("SELECT id FROM students WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}
