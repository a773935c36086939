use serde_json::Value;
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{CandidateProfile, ProfileRecord};

fn text(row: &PgRow, column: &str) -> String {
    row.get::<Option<String>, _>(column).unwrap_or_default()
}

fn list(row: &PgRow, column: &str) -> Vec<Value> {
    row.get::<Option<Json<Vec<Value>>>, _>(column)
        .map(|Json(values)| values)
        .unwrap_or_default()
}

fn profile_from_row(row: &PgRow) -> CandidateProfile {
    CandidateProfile {
        experience_level: text(row, "experience_level"),
        serving_notice: text(row, "serving_notice"),
        full_name: text(row, "full_name"),
        email: text(row, "email"),
        phone: text(row, "phone"),
        notice_period: text(row, "notice_period"),
        last_working_day: text(row, "last_working_day"),
        linkedin_url: text(row, "linkedin_url"),
        portfolio_url: text(row, "portfolio_url"),
        current_location: text(row, "current_location"),
        preferred_location: text(row, "preferred_location"),
        resume_file_name: text(row, "resume_file_name"),
        education: list(row, "education"),
        certifications: list(row, "certifications"),
        experiences: list(row, "experiences"),
        completed: row.get("completed"),
    }
}

pub(crate) async fn find_profile(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<CandidateProfile>, sqlx::Error> {
    let query = r"
        SELECT experience_level, serving_notice, full_name, email, phone,
               notice_period, last_working_day, linkedin_url, portfolio_url,
               current_location, preferred_location, resume_file_name,
               education, certifications, experiences, completed
        FROM candidate_profiles
        WHERE candidate_id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(candidate_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.as_ref().map(profile_from_row))
}

pub(crate) async fn upsert_profile(
    pool: &PgPool,
    candidate_id: Uuid,
    record: &ProfileRecord,
) -> Result<(), sqlx::Error> {
    let query = r"
        INSERT INTO candidate_profiles (
            candidate_id, full_name, email, phone,
            experience_level, serving_notice, notice_period, last_working_day,
            linkedin_url, portfolio_url, current_location, preferred_location,
            resume_file_name, education, certifications, experiences, completed, resume
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        ON CONFLICT (candidate_id) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            email = EXCLUDED.email,
            phone = EXCLUDED.phone,
            experience_level = EXCLUDED.experience_level,
            serving_notice = EXCLUDED.serving_notice,
            notice_period = EXCLUDED.notice_period,
            last_working_day = EXCLUDED.last_working_day,
            linkedin_url = EXCLUDED.linkedin_url,
            portfolio_url = EXCLUDED.portfolio_url,
            current_location = EXCLUDED.current_location,
            preferred_location = EXCLUDED.preferred_location,
            resume_file_name = EXCLUDED.resume_file_name,
            education = EXCLUDED.education,
            certifications = EXCLUDED.certifications,
            experiences = EXCLUDED.experiences,
            completed = EXCLUDED.completed,
            resume = COALESCE(EXCLUDED.resume, candidate_profiles.resume),
            updated_at = NOW()
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(candidate_id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.experience_level)
        .bind(&record.serving_notice)
        .bind(&record.notice_period)
        .bind(&record.last_working_day)
        .bind(&record.linkedin_url)
        .bind(&record.portfolio_url)
        .bind(&record.current_location)
        .bind(&record.preferred_location)
        .bind(&record.resume_file_name)
        .bind(Json(&record.education))
        .bind(Json(&record.certifications))
        .bind(Json(&record.experiences))
        .bind(record.completed)
        .bind(record.resume.as_deref())
        .execute(pool)
        .instrument(span)
        .await?;
    Ok(())
}

/// Stored resume bytes and file name, `None` when nothing was uploaded.
pub(crate) async fn find_resume(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<(Vec<u8>, Option<String>)>, sqlx::Error> {
    let query = r"
        SELECT resume, resume_file_name
        FROM candidate_profiles
        WHERE candidate_id = $1 AND resume IS NOT NULL AND octet_length(resume) > 0
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(candidate_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.map(|row| (row.get("resume"), row.get("resume_file_name"))))
}

/// False when the candidate has no profile or has not marked it complete.
pub(crate) async fn is_completed(pool: &PgPool, candidate_id: Uuid) -> Result<bool, sqlx::Error> {
    let query = "SELECT completed FROM candidate_profiles WHERE candidate_id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let completed: Option<bool> = sqlx::query_scalar(query)
        .bind(candidate_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(completed.unwrap_or(false))
}
