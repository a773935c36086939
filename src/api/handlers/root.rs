use axum::response::{IntoResponse, Json};
use serde_json::json;

use crate::GIT_COMMIT_HASH;

// axum handler for /
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Job portal API",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build": GIT_COMMIT_HASH,
    }))
}
