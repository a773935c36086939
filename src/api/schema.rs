//! Embedded `sql/schema.sql` and the bootstrap that applies it.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{Instrument, info, info_span};

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Split a SQL script into statements on lines ending with `;`.
///
/// Comment-only lines are dropped; the script must not put `;` at the end of a
/// line inside a function body.
#[must_use]
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

/// Run every statement of the embedded schema. Safe to repeat.
///
/// # Errors
/// Returns an error naming the statement that failed.
pub async fn apply_schema(pool: &PgPool) -> Result<()> {
    let statements = split_sql_statements(SCHEMA_SQL);
    for (index, statement) in statements.iter().enumerate() {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DDL",
            db.statement = statement.as_str()
        );
        sqlx::query(statement)
            .execute(pool)
            .instrument(span)
            .await
            .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
    }
    info!(statements = statements.len(), "schema applied");
    Ok(())
}
