//! Role and ownership gates.

use uuid::Uuid;

use super::{
    kind::AccountKind,
    store::{CredentialStore, StoreError},
    token::Claims,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    RoleMismatch,
    NotOwner,
    AccountMissing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[must_use]
pub fn require_role(claims: &Claims, expected: AccountKind) -> AccessDecision {
    if claims.role == expected {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::RoleMismatch)
    }
}

/// A resource with no owner (e.g. its poster was deleted) belongs to nobody.
#[must_use]
pub fn require_ownership(owner: Option<Uuid>, claims: &Claims) -> AccessDecision {
    if owner == Some(claims.sub) {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::NotOwner)
    }
}

/// Confirm the identity behind a still-valid token has not been removed.
///
/// With the cascading schema a removed identity takes its sessions along, so
/// `authenticate` already refuses the token. This covers stores that keep
/// sessions past their identity.
///
/// # Errors
/// Returns a storage error if the lookup fails.
pub async fn verify_still_exists<S>(store: &S, claims: &Claims) -> Result<AccessDecision, StoreError>
where
    S: CredentialStore + ?Sized,
{
    let found = store.find_identity_by_id(claims.role, claims.sub).await?;
    Ok(if found.is_some() {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::AccountMissing)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: AccountKind) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role,
            iat: 0,
            exp: 0,
            jti: Uuid::new_v4(),
        }
    }

    #[test]
    fn role_gate() {
        let hr = claims(AccountKind::Hr);
        assert_eq!(require_role(&hr, AccountKind::Hr), AccessDecision::Allow);
        assert_eq!(
            require_role(&hr, AccountKind::Candidate),
            AccessDecision::Deny(DenyReason::RoleMismatch)
        );
    }

    #[test]
    fn ownership_gate() {
        let hr = claims(AccountKind::Hr);
        assert!(require_ownership(Some(hr.sub), &hr).is_allowed());
        assert_eq!(
            require_ownership(Some(Uuid::new_v4()), &hr),
            AccessDecision::Deny(DenyReason::NotOwner)
        );
        assert_eq!(
            require_ownership(None, &hr),
            AccessDecision::Deny(DenyReason::NotOwner)
        );
    }
}
