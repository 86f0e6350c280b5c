//! Whether a viewer may rate a task's counterpart.

use crate::account::domain::UserId;
use serde::{Deserialize, Serialize};

/// Why a viewer cannot leave a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    /// Nobody is signed in.
    Anonymous,
    /// The task does not exist.
    TaskNotFound,
    /// The task is not closed yet.
    TaskNotClosed,
    /// The viewer is neither author nor executor.
    NotParticipant,
    /// The viewer already rated this task.
    AlreadyRated,
    /// The task has no other participant to rate.
    NoCounterpart,
}

/// Outcome of a rating eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RatingEligibility {
    /// The viewer may rate `rated`.
    Eligible {
        /// User the viewer may rate.
        rated: UserId,
        /// Whether the viewer is the task author.
        rater_is_author: bool,
    },
    /// The viewer may not rate anyone on this task.
    Ineligible(IneligibleReason),
}

impl RatingEligibility {
    /// Returns `true` for [`RatingEligibility::Eligible`].
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible { .. })
    }
}
