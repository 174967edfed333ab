//! Recipe verification state machine.
//!
//! ```text
//! pending_verification --verify-----------> verified
//! pending_verification --request_revision-> needs_revision
//! needs_revision       --verify-----------> verified
//! needs_revision       --resubmit---------> pending_verification
//! ```
//!
//! `verified` has no outgoing transitions. Checks run in a fixed order:
//! source state, then the actor guard, then the event payload.

use crate::access::{Actor, Capability};
use crate::error::{TransitionError, ValidationError};
use crate::types::VerificationStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    Verify,
    RequestRevision { notes: String },
    Resubmit,
}

impl ReviewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ReviewEvent::Verify => "verify",
            ReviewEvent::RequestRevision { .. } => "request_revision",
            ReviewEvent::Resubmit => "resubmit",
        }
    }

    /// The event that moves a recipe into `target`.
    pub fn toward(target: VerificationStatus, notes: Option<String>) -> Self {
        match target {
            VerificationStatus::Verified => ReviewEvent::Verify,
            VerificationStatus::NeedsRevision => ReviewEvent::RequestRevision {
                notes: notes.unwrap_or_default(),
            },
            VerificationStatus::PendingVerification => ReviewEvent::Resubmit,
        }
    }

    fn legal_from(&self, status: VerificationStatus) -> bool {
        use crate::types::VerificationStatus::*;
        match self {
            ReviewEvent::Verify => matches!(status, PendingVerification | NeedsRevision),
            ReviewEvent::RequestRevision { .. } => matches!(status, PendingVerification),
            ReviewEvent::Resubmit => matches!(status, NeedsRevision),
        }
    }
}

/// What happens to the reviewer columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerLink {
    /// Set `verified_by_id` and stamp `verified_at`.
    Verified { reviewer_id: i32 },
    /// Set `verified_by_id` for attribution and clear `verified_at`.
    RevisionRequested { reviewer_id: i32 },
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: VerificationStatus,
    pub to: VerificationStatus,
    pub reviewer: ReviewerLink,
    /// New health tips; `None` leaves the stored value untouched.
    pub health_tips: Option<String>,
}

/// Decide whether `actor` may apply `event` to a recipe in `current`, and
/// what the write should look like.
pub fn plan_transition(
    current: VerificationStatus,
    event: &ReviewEvent,
    actor: &Actor,
    author_id: i32,
) -> Result<Transition, TransitionError> {
    if !event.legal_from(current) {
        return Err(TransitionError::InvalidState {
            from: current,
            event: event.name(),
        });
    }

    match event {
        ReviewEvent::Verify => {
            actor.require(Capability::ReviewRecipes)?;
            Ok(Transition {
                from: current,
                to: VerificationStatus::Verified,
                reviewer: ReviewerLink::Verified {
                    reviewer_id: actor.user_id,
                },
                health_tips: None,
            })
        }
        ReviewEvent::RequestRevision { notes } => {
            actor.require(Capability::ReviewRecipes)?;
            let notes = notes.trim();
            if notes.is_empty() {
                return Err(ValidationError::single("Revision notes cannot be empty").into());
            }
            Ok(Transition {
                from: current,
                to: VerificationStatus::NeedsRevision,
                reviewer: ReviewerLink::RevisionRequested {
                    reviewer_id: actor.user_id,
                },
                health_tips: Some(notes.to_string()),
            })
        }
        ReviewEvent::Resubmit => {
            actor.require_owner(author_id)?;
            Ok(Transition {
                from: current,
                to: VerificationStatus::PendingVerification,
                reviewer: ReviewerLink::Unchanged,
                health_tips: None,
            })
        }
    }
}
