//! Access rules for a single local user.

use begrep_domain::traits::Authorizer;
use begrep_domain::Role;

/// Grants one principal the same role in every catalog of the local database
#[derive(Debug, Clone)]
pub struct LocalAccess {
    principal: String,
    role: Role,
}

impl LocalAccess {
    /// Grant `role` to `principal`
    pub fn new(principal: impl Into<String>, role: Role) -> Self {
        Self {
            principal: principal.into(),
            role,
        }
    }

    fn has(&self, principal: &str, required: Role) -> bool {
        principal == self.principal && self.role >= required
    }
}

impl Authorizer for LocalAccess {
    fn can_read(&self, principal: &str, _organization_id: &str) -> bool {
        self.has(principal, Role::Read)
    }

    fn can_write(&self, principal: &str, _organization_id: &str) -> bool {
        self.has(principal, Role::Write)
    }

    fn can_admin(&self, principal: &str, _organization_id: &str) -> bool {
        self.has(principal, Role::Admin)
    }
}
