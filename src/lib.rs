//! # Jobportal
//!
//! `jobportal` is the backend for a two-sided job board. HR accounts publish and
//! manage job listings, candidate accounts maintain a profile and apply to or
//! bookmark listings.
//!
//! ## Accounts
//!
//! HR and candidate accounts live in parallel tables but share one
//! implementation parameterized by the account kind.
//! An account is an identity row plus a credential row created in one transaction.
//!
//! ## Authentication
//!
//! Passwords are hashed with Argon2id. A successful login issues an HS256 bearer
//! token and registers the token's SHA-256 hash in the session registry. Requests
//! are only authenticated while that registry entry exists, so logout revokes the
//! token immediately instead of waiting for it to expire.
//!
//! Every login attempt is appended to `login_history`. Five failures for the same
//! `(email, kind)` within fifteen minutes lock further attempts, and each rejected
//! attempt counts as another failure.
//!
//! ## Authorization
//!
//! Role gates answer `403`. Resources owned by another account answer `404`
//! instead of `403` so listings cannot be enumerated.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("jobportal/"));
        assert!(APP_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
