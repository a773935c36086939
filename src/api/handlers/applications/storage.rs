use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{AppliedJob, Application, SavedJob};
use crate::api::handlers::jobs::storage::job_from_row;

pub(crate) const STATUS_PENDING: &str = "pending";

pub(crate) async fn application_exists(
    pool: &PgPool,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let query = "SELECT EXISTS (SELECT 1 FROM applications WHERE candidate_id = $1 AND job_id = $2)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    sqlx::query_scalar(query)
        .bind(candidate_id)
        .bind(job_id)
        .fetch_one(pool)
        .instrument(span)
        .await
}

/// Fails with a unique violation if the candidate already applied.
pub(crate) async fn insert_application(
    pool: &PgPool,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Result<Uuid, sqlx::Error> {
    let query = "INSERT INTO applications (candidate_id, job_id, status) VALUES ($1, $2, $3) RETURNING id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query_scalar(query)
        .bind(candidate_id)
        .bind(job_id)
        .bind(STATUS_PENDING)
        .fetch_one(pool)
        .instrument(span)
        .await
}

pub(crate) async fn list_applications(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<Application>, sqlx::Error> {
    let query = r"
        SELECT a.id, a.job_id, a.status, a.applied_at,
               j.title, j.company, j.location, j.salary,
               j.experience_from, j.experience_to, j.description
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.candidate_id = $1
        ORDER BY a.applied_at DESC
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(candidate_id)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    Ok(rows
        .iter()
        .map(|row| {
            let job_id: Uuid = row.get("job_id");
            Application {
                id: row.get("id"),
                job_id,
                status: row.get("status"),
                applied_at: row.get("applied_at"),
                job: AppliedJob {
                    id: job_id,
                    title: row.get("title"),
                    company: row.get("company"),
                    location: row.get("location"),
                    salary: row.get("salary"),
                    experience_from: row.get("experience_from"),
                    experience_to: row.get("experience_to"),
                    description: row.get("description"),
                },
            }
        })
        .collect())
}

/// Flip the saved state for `(candidate, job)`; returns the new state.
pub(crate) async fn toggle_saved_job(
    pool: &PgPool,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let delete = "DELETE FROM saved_jobs WHERE candidate_id = $1 AND job_id = $2";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = delete
    );
    let removed = sqlx::query(delete)
        .bind(candidate_id)
        .bind(job_id)
        .execute(pool)
        .instrument(span)
        .await?
        .rows_affected();
    if removed > 0 {
        return Ok(false);
    }

    let insert = "INSERT INTO saved_jobs (candidate_id, job_id) VALUES ($1, $2) \
                  ON CONFLICT (candidate_id, job_id) DO NOTHING";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = insert
    );
    sqlx::query(insert)
        .bind(candidate_id)
        .bind(job_id)
        .execute(pool)
        .instrument(span)
        .await?;
    Ok(true)
}

pub(crate) async fn list_saved_jobs(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<SavedJob>, sqlx::Error> {
    let query = r"
        SELECT j.id, j.title, j.company, j.location, j.salary, j.experience_from,
               j.experience_to, j.description, j.enabled, j.posted_on, s.saved_at
        FROM saved_jobs s
        JOIN jobs j ON j.id = s.job_id
        WHERE s.candidate_id = $1
        ORDER BY s.saved_at DESC
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(candidate_id)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    Ok(rows
        .iter()
        .map(|row| SavedJob {
            job: job_from_row(row),
            saved_at: row.get("saved_at"),
        })
        .collect())
}
