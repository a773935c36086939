use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{Job, JobUpdate, NewJob};

const JOB_COLUMNS: &str = "id, title, company, location, salary, experience_from, experience_to, \
                           description, enabled, posted_on";

pub(crate) fn job_from_row(row: &PgRow) -> Job {
    Job {
        id: row.get("id"),
        title: row.get("title"),
        company: row.get("company"),
        location: row.get("location"),
        salary: row.get("salary"),
        experience_from: row.get("experience_from"),
        experience_to: row.get("experience_to"),
        description: row.get("description"),
        enabled: row.get("enabled"),
        posted_on: row.get("posted_on"),
    }
}

pub(crate) async fn list_enabled_jobs(pool: &PgPool) -> Result<Vec<Job>, sqlx::Error> {
    let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE enabled ORDER BY posted_on DESC");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query).fetch_all(pool).instrument(span).await?;
    Ok(rows.iter().map(job_from_row).collect())
}

pub(crate) async fn list_jobs_posted_by(
    pool: &PgPool,
    hr_id: Uuid,
) -> Result<Vec<Job>, sqlx::Error> {
    let query =
        format!("SELECT {JOB_COLUMNS} FROM jobs WHERE posted_by = $1 ORDER BY posted_on DESC");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(hr_id)
        .fetch_all(pool)
        .instrument(span)
        .await?;
    Ok(rows.iter().map(job_from_row).collect())
}

pub(crate) async fn find_job(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.as_ref().map(job_from_row))
}

/// `None` when the job does not exist; `Some(None)` when its poster is gone.
pub(crate) async fn job_owner(pool: &PgPool, id: Uuid) -> Result<Option<Option<Uuid>>, sqlx::Error> {
    let query = "SELECT posted_by FROM jobs WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    sqlx::query_scalar(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
}

pub(crate) async fn insert_job(
    pool: &PgPool,
    job: &NewJob,
    posted_by: Uuid,
) -> Result<Job, sqlx::Error> {
    let query = format!(
        "INSERT INTO jobs (title, company, location, salary, experience_from, experience_to, \
         description, posted_by, enabled) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE) \
         RETURNING {JOB_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.salary)
        .bind(job.experience_from)
        .bind(job.experience_to)
        .bind(&job.description)
        .bind(posted_by)
        .fetch_one(pool)
        .instrument(span)
        .await?;
    Ok(job_from_row(&row))
}

pub(crate) async fn update_job(
    pool: &PgPool,
    id: Uuid,
    update: &JobUpdate,
) -> Result<Option<Job>, sqlx::Error> {
    let query = format!(
        "UPDATE jobs SET title = COALESCE($2, title), location = COALESCE($3, location), \
         salary = $4, experience_from = $5, experience_to = $6, \
         description = COALESCE($7, description) WHERE id = $1 RETURNING {JOB_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(&update.title)
        .bind(&update.location)
        .bind(&update.salary)
        .bind(update.experience_from)
        .bind(update.experience_to)
        .bind(&update.description)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.as_ref().map(job_from_row))
}

pub(crate) async fn set_job_enabled(
    pool: &PgPool,
    id: Uuid,
    enabled: bool,
) -> Result<bool, sqlx::Error> {
    let query = "UPDATE jobs SET enabled = $2 WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .bind(enabled)
        .execute(pool)
        .instrument(span)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_job(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let query = "DELETE FROM jobs WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await?;
    Ok(result.rows_affected() > 0)
}
