//! Role table implementation of [`Authorizer`]

use crate::traits::Authorizer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a principal in an organization; each role includes the ones below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read access
    Read,
    /// Read and write access
    Write,
    /// Full access including publishing
    Admin,
}

/// Static mapping of (principal, organization) to a role
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    roles: HashMap<(String, String), Role>,
}

impl RoleTable {
    /// Create an empty table (denies everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a role, replacing any previous one
    pub fn grant(
        mut self,
        principal: impl Into<String>,
        organization_id: impl Into<String>,
        role: Role,
    ) -> Self {
        self.roles
            .insert((principal.into(), organization_id.into()), role);
        self
    }

    fn has(&self, principal: &str, organization_id: &str, required: Role) -> bool {
        self.roles
            .get(&(principal.to_string(), organization_id.to_string()))
            .is_some_and(|role| *role >= required)
    }
}

impl Authorizer for RoleTable {
    fn can_read(&self, principal: &str, organization_id: &str) -> bool {
        self.has(principal, organization_id, Role::Read)
    }

    fn can_write(&self, principal: &str, organization_id: &str) -> bool {
        self.has(principal, organization_id, Role::Write)
    }

    fn can_admin(&self, principal: &str, organization_id: &str) -> bool {
        self.has(principal, organization_id, Role::Admin)
    }
}
