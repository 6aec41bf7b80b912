//! Owner-or-admin authorization policy.
//!
//! The caller identity arrives with every request as an explicit [`Caller`]
//! value; nothing here reads process-wide state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ROLE_ADMIN, ROLE_USER};
use crate::error::{ServiceError, ServiceResult};

/// Role claim attached to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Interpret a role claim. Only `"admin"` elevates; anything else, including
    /// an absent claim, is an ordinary user.
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some(ROLE_ADMIN) => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and role of whoever issued a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caller {
    pub id: Option<String>,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: Some(id.into()),
            role,
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(id, Role::User)
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(id, Role::Admin)
    }

    /// A caller without an established identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a caller from raw identity claims as delivered by the credential layer.
    pub fn from_claims(id: Option<&str>, role: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_string),
            role: Role::from_claim(role),
        }
    }

    /// The caller id, or `Unauthenticated` when it is absent or empty.
    pub fn require_identity(&self) -> ServiceResult<&str> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ServiceError::Unauthenticated),
        }
    }

    pub fn can_mutate(&self, owner_id: &str) -> bool {
        can_mutate(self.id.as_deref(), self.role, owner_id)
    }
}

/// True iff the caller owns the resource or is an administrator.
///
/// A missing or empty caller id is always denied, even for the admin role.
pub fn can_mutate(caller_id: Option<&str>, caller_role: Role, owner_id: &str) -> bool {
    match caller_id {
        Some(id) if !id.is_empty() => id == owner_id || caller_role == Role::Admin,
        _ => false,
    }
}

/// Resolve identity and apply the policy in one step, mapping the outcome to
/// the service error taxonomy.
pub fn authorize_mutation(caller: &Caller, owner_id: &str, resource: &str) -> ServiceResult<()> {
    let caller_id = caller.require_identity()?;
    if caller.can_mutate(owner_id) {
        Ok(())
    } else {
        log::warn!("Denied {} mutation of {} owned by {}", caller_id, resource, owner_id);
        Err(ServiceError::Forbidden(format!(
            "only the owner or an administrator can modify {}",
            resource
        )))
    }
}
