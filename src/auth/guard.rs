//! Ownership-based authorization.
//!
//! Callers fetch the resource first (so absence is reported as not found)
//! and then ask the guard before reading, mutating or deleting it.

use crate::types::{AppError, Identity, Result, Todo};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Resources that belong to exactly one account.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

impl Owned for Todo {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// `Allow` iff the caller is the owner. No roles, no overrides.
pub fn authorize(identity: &Identity, resource_owner_id: &str) -> Decision {
    if identity.subject_id == resource_owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Turns a `Deny` for `resource` into [`AppError::Forbidden`].
pub fn ensure_owner<R: Owned>(identity: &Identity, resource: &R, action: &str) -> Result<()> {
    match authorize(identity, resource.owner_id()) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::debug!(
                subject = %identity.subject_id,
                action,
                "ownership check denied"
            );
            Err(AppError::Forbidden(format!("Not authorized to {}", action)))
        }
    }
}
