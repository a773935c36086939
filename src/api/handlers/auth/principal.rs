//! Authenticated caller resolved from a bearer token.

use uuid::Uuid;

use super::{kind::AccountKind, token::Claims};

#[derive(Clone, Debug)]
pub(crate) struct Principal {
    pub claims: Claims,
    /// Registry row backing the presented token.
    pub session_id: Uuid,
}

impl Principal {
    pub(crate) const fn id(&self) -> Uuid {
        self.claims.sub
    }

    pub(crate) const fn kind(&self) -> AccountKind {
        self.claims.role
    }
}
