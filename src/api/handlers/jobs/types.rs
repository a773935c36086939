use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub experience_from: Option<i32>,
    pub experience_to: Option<i32>,
    pub description: String,
    pub enabled: bool,
    pub posted_on: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub experience_from: Option<i32>,
    pub experience_to: Option<i32>,
    pub description: Option<String>,
}

/// Omitted title, location, or description keep their stored value; salary and
/// the experience range are always replaced.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub experience_from: Option<i32>,
    pub experience_to: Option<i32>,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct SetEnabledRequest {
    pub enabled: Option<bool>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct SetEnabledResponse {
    pub message: String,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub experience_from: Option<i32>,
    pub experience_to: Option<i32>,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct JobUpdate {
    pub title: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub experience_from: Option<i32>,
    pub experience_to: Option<i32>,
    pub description: Option<String>,
}
