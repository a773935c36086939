use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::handlers::jobs::types::Job;

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyRequest {
    pub job_id: Option<String>,
}

/// Job summary embedded in an application.
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJob {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub experience_from: Option<i32>,
    pub experience_to: Option<i32>,
    pub description: String,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub job: AppliedJob,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    #[serde(flatten)]
    pub job: Job,
    pub saved_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct SaveToggleResponse {
    pub message: String,
    pub saved: bool,
}

impl SaveToggleResponse {
    pub(crate) fn new(saved: bool) -> Self {
        let message = if saved {
            "Job saved"
        } else {
            "Job removed from saved"
        };
        Self {
            message: message.to_string(),
            saved,
        }
    }
}
