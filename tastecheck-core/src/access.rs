//! Role capabilities and ownership checks.
//!
//! Every permission decision goes through [`Actor`]. Ownership failures are
//! reported as [`AccessError::NotFound`] so non-owners cannot discover
//! recipes they are not allowed to see; role failures are
//! [`AccessError::Forbidden`].

use crate::error::AccessError;
use crate::types::{Role, VerificationStatus};
use std::fmt;

/// A permission granted by a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create recipes and own them.
    AuthorRecipes,
    /// Verify recipes or send them back for revision.
    ReviewRecipes,
    /// Write nutritionist guidance into a recipe's health tips.
    WriteHealthTips,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AuthorRecipes => "author_recipes",
            Capability::ReviewRecipes => "review_recipes",
            Capability::WriteHealthTips => "write_health_tips",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::AuthorRecipes => matches!(self, Role::RecipeDeveloper),
            Capability::ReviewRecipes | Capability::WriteHealthTips => {
                matches!(self, Role::Nutritionist)
            }
        }
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.role.grants(capability)
    }

    pub fn require(&self, capability: Capability) -> Result<(), AccessError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(AccessError::Forbidden(capability))
        }
    }

    pub fn is_owner(&self, author_id: i32) -> bool {
        self.user_id == author_id
    }

    pub fn require_owner(&self, author_id: i32) -> Result<(), AccessError> {
        if self.is_owner(author_id) {
            Ok(())
        } else {
            Err(AccessError::NotFound)
        }
    }

    /// Verified recipes are visible to everyone; unverified ones only to
    /// their author and to reviewers.
    pub fn can_view(&self, author_id: i32, status: VerificationStatus) -> bool {
        status.is_public() || self.is_owner(author_id) || self.has(Capability::ReviewRecipes)
    }

    pub fn require_view(
        &self,
        author_id: i32,
        status: VerificationStatus,
    ) -> Result<(), AccessError> {
        if self.can_view(author_id, status) {
            Ok(())
        } else {
            Err(AccessError::NotFound)
        }
    }
}
