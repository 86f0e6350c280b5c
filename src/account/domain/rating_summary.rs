//! Denormalized rating totals shown on profiles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean score in tenths, e.g. `45` renders as `4.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingAverage(u16);

impl RatingAverage {
    /// Wraps a stored tenths value.
    #[must_use]
    pub const fn from_tenths(tenths: u16) -> Self {
        Self(tenths)
    }

    /// Computes the mean of `count` scores summing to `sum`, rounded half-up
    /// to one decimal place. Returns `None` when `count` is zero.
    #[must_use]
    pub fn from_totals(sum: u64, count: u64) -> Option<Self> {
        // round(sum * 10 / count) == (20 * sum + count) / (2 * count)
        let numerator = sum.checked_mul(20)?.checked_add(count)?;
        let denominator = count.checked_mul(2)?;
        let tenths = numerator.checked_div(denominator)?;
        u16::try_from(tenths).ok().map(Self)
    }

    /// Returns the average in tenths.
    #[must_use]
    pub const fn tenths(self) -> u16 {
        self.0
    }
}

impl fmt::Display for RatingAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.checked_div(10).unwrap_or_default();
        let fraction = self.0.checked_rem(10).unwrap_or_default();
        write!(f, "{whole}.{fraction}")
    }
}

/// Rolling rating totals for a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    average: Option<RatingAverage>,
    total: u32,
}

impl RatingSummary {
    /// Summary for a user nobody has rated yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            average: None,
            total: 0,
        }
    }

    /// Builds a summary from the sum and count of received scores.
    #[must_use]
    pub fn from_totals(sum: u64, count: u64) -> Self {
        Self {
            average: RatingAverage::from_totals(sum, count),
            total: u32::try_from(count).unwrap_or(u32::MAX),
        }
    }

    /// Reconstructs a summary from stored columns.
    #[must_use]
    pub const fn from_persisted(average: Option<RatingAverage>, total: u32) -> Self {
        Self { average, total }
    }

    /// Returns the rounded average, if any rating exists.
    #[must_use]
    pub const fn average(&self) -> Option<RatingAverage> {
        self.average
    }

    /// Returns the number of ratings received.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }
}
