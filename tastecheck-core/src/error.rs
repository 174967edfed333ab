use crate::access::Capability;
use crate::types::VerificationStatus;
use thiserror::Error;

/// Submitted content failed validation. Carries every problem found so the
/// client can fix them in one round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .problems.join("; "))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

impl ValidationError {
    pub fn single(problem: impl Into<String>) -> Self {
        Self {
            problems: vec![problem.into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The recipe is absent or hidden from this caller.
    #[error("Recipe not found")]
    NotFound,

    #[error("Requires the {0} permission")]
    Forbidden(Capability),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot {event} a recipe that is {from}")]
    InvalidState {
        from: VerificationStatus,
        event: &'static str,
    },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A normalized ingredient or unit that was missing from the resolved map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnresolvedReference {
    #[error("Ingredient '{0}' was not resolved")]
    Ingredient(String),

    #[error("Unit '{0}' was not resolved")]
    Unit(String),
}
