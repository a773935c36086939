//! Authentication, sessions, and access control for both account kinds.
//!
//! HR and candidate accounts share one implementation parameterized by
//! `AccountKind`; each kind keeps its own identity, credential, and session
//! tables.
//!
//! ## Tokens and the session registry
//!
//! Login mints an HS256 token and stores its SHA-256 in the kind's session
//! table. A request is authenticated only when the token verifies *and* its
//! hash is still registered, so logout revokes immediately.
//!
//! ## Login throttling
//!
//! Every login attempt lands in `login_history`. With 5 or more failures for an
//! (email, kind) pair in the trailing 15 minutes the attempt is refused before
//! the password is checked, and the refusal is itself recorded as a failure:
//! clients that keep retrying stay locked, clients that stop are unlocked once
//! the window passes.

pub(crate) mod access;
pub(crate) mod candidate;
pub(crate) mod hr;
pub(crate) mod kind;
mod password;
pub(crate) mod principal;
mod rate_limit;
mod reaper;
mod service;
mod state;
mod storage;
mod store;
pub(crate) mod token;
pub mod types;
pub(crate) mod utils;

#[cfg(test)]
mod memory;

pub use kind::AccountKind;
pub use reaper::spawn_session_reaper;
pub use state::{AuthConfig, AuthState, MAX_LOGIN_FAILURE_WINDOW_MINUTES, MAX_TOKEN_TTL_SECONDS};
pub use storage::PgAuthStore;
pub use store::StoreError;
