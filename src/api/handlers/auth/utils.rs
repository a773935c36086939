//! Request parsing and storage classification shared by the auth flows.

use axum::http::{
    HeaderMap,
    header::{AUTHORIZATION, USER_AGENT},
};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use sqlx::error::ErrorKind;

use super::kind::ClientInfo;

/// Something@something.tld with no whitespace; the mailbox itself is not checked.
static EMAIL_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Proxy headers consulted for the client address, most specific first.
const CLIENT_IP_HEADERS: [&str; 2] = ["x-forwarded-for", "x-real-ip"];

/// Lookup key for an email: trimmed and lowercased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Expects input already passed through [`normalize_email`].
pub(crate) fn valid_email(email: &str) -> bool {
    EMAIL_SHAPE
        .as_ref()
        .is_some_and(|shape| shape.is_match(email))
}

/// SHA-256 of a bearer token; registries store only this.
pub(crate) fn hash_session_token(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}

fn constraint_kind(err: &sqlx::Error) -> Option<ErrorKind> {
    err.as_database_error().map(|db_err| db_err.kind())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(constraint_kind(err), Some(ErrorKind::UniqueViolation))
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(constraint_kind(err), Some(ErrorKind::ForeignKeyViolation))
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// First address in the first proxy header that carries one.
pub(crate) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    CLIENT_IP_HEADERS.iter().find_map(|name| {
        let value = headers.get(*name)?.to_str().ok()?;
        let first_hop = value.split(',').next()?.trim();
        (!first_hop.is_empty()).then(|| first_hop.to_string())
    })
}

pub(crate) fn client_info(headers: &HeaderMap) -> ClientInfo {
    ClientInfo {
        ip_address: extract_client_ip(headers),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}
