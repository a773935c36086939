use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Candidate profile as the frontend reads it: absent text fields are `""`.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateProfile {
    pub experience_level: String,
    pub serving_notice: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub notice_period: String,
    pub last_working_day: String,
    pub linkedin_url: String,
    pub portfolio_url: String,
    pub current_location: String,
    pub preferred_location: String,
    pub resume_file_name: String,
    pub education: Vec<Value>,
    pub certifications: Vec<Value>,
    pub experiences: Vec<Value>,
    pub completed: bool,
}

impl CandidateProfile {
    /// Blank profile shown before the candidate saves one.
    pub(crate) fn empty(email: &str) -> Self {
        Self {
            email: email.to_string(),
            ..Self::default()
        }
    }
}

/// Upsert payload; empty strings are stored as NULL.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveProfileRequest {
    pub experience_level: Option<String>,
    pub serving_notice: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notice_period: Option<String>,
    pub last_working_day: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub current_location: Option<String>,
    pub preferred_location: Option<String>,
    pub resume_file_name: Option<String>,
    /// Base64-encoded PDF. Omitted or empty keeps the stored file.
    pub resume: Option<String>,
    pub education: Option<Vec<Value>>,
    pub certifications: Option<Vec<Value>>,
    pub experiences: Option<Vec<Value>>,
    pub completed: Option<bool>,
}

/// Normalized row written by `storage::upsert_profile`.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProfileRecord {
    pub experience_level: Option<String>,
    pub serving_notice: Option<String>,
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub notice_period: Option<String>,
    pub last_working_day: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub current_location: Option<String>,
    pub preferred_location: Option<String>,
    pub resume_file_name: Option<String>,
    /// `None` leaves the stored resume untouched.
    pub resume: Option<Vec<u8>>,
    pub education: Vec<Value>,
    pub certifications: Vec<Value>,
    pub experiences: Vec<Value>,
    pub completed: bool,
}
