//! Ownership replay: splits a ticket's lifetime into classification buckets.
//!
//! The ticket is modeled as a single-valued "current holder" state that
//! starts with the customer and moves on every non-ignored event. Time is
//! credited to the *counterpart* of the holder: while the customer holds the
//! ticket, support is the one working it, so the elapsed slice lands in the
//! support bucket, and vice versa. A bug-state holder accrues to the bug
//! bucket directly. Every call is a full deterministic replay; nothing is
//! carried over between calls.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::calendar::{BusinessCalendar, seconds_between};
use crate::timeline::TicketTimeline;
use crate::types::Classification;

/// Wall-clock and business-hours seconds accrued by one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketTotals {
    pub wall_seconds: f64,
    pub business_seconds: f64,
}

/// Totals for all four buckets.
///
/// Always fully populated: one replay produces the whole value, so there is
/// no partially-initialized or lazily-completed state to drift out of sync
/// with the current classifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttributionResult {
    pub customer: BucketTotals,
    pub support: BucketTotals,
    pub bug: BucketTotals,
    pub ignored: BucketTotals,
}

impl AttributionResult {
    #[must_use]
    pub const fn bucket(&self, classification: Classification) -> &BucketTotals {
        match classification {
            Classification::Customer => &self.customer,
            Classification::Support => &self.support,
            Classification::Bug => &self.bug,
            Classification::Ignored => &self.ignored,
        }
    }

    const fn bucket_mut(&mut self, classification: Classification) -> &mut BucketTotals {
        match classification {
            Classification::Customer => &mut self.customer,
            Classification::Support => &mut self.support,
            Classification::Bug => &mut self.bug,
            Classification::Ignored => &mut self.ignored,
        }
    }

    /// Sum of all four wall-clock totals.
    #[must_use]
    pub fn wall_total(&self) -> f64 {
        self.customer.wall_seconds
            + self.support.wall_seconds
            + self.bug.wall_seconds
            + self.ignored.wall_seconds
    }

    /// Sum of all four business-hours totals.
    #[must_use]
    pub fn business_total(&self) -> f64 {
        self.customer.business_seconds
            + self.support.business_seconds
            + self.bug.business_seconds
            + self.ignored.business_seconds
    }
}

/// The party conceptually holding the ticket. Never `Ignored`: an ignored
/// event leaves the previous holder in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Customer,
    Support,
    Bug,
}

impl Owner {
    const fn from_classification(classification: Classification) -> Option<Self> {
        match classification {
            Classification::Customer => Some(Self::Customer),
            Classification::Support => Some(Self::Support),
            Classification::Bug => Some(Self::Bug),
            Classification::Ignored => None,
        }
    }

    /// The bucket credited while this holder has the ticket: whoever holds
    /// it is the party *not* accruing time.
    const fn credited_bucket(self) -> Classification {
        match self {
            Self::Customer => Classification::Support,
            Self::Support => Classification::Customer,
            Self::Bug => Classification::Bug,
        }
    }
}

/// Replays a ticket timeline against a business calendar.
///
/// Each non-ignored event credits the slice since the previous instant to
/// the current holder's counterpart bucket, then hands the ticket to the
/// event's classification. An ignored event sends its slice to the ignored
/// bucket without moving ownership. The trailing slice up to the timeline's
/// final instant always resolves through the holder rule; there is no event
/// at the end that could mark it ignored.
///
/// Purely functional: the timeline is never mutated, and the result is
/// rebuilt from scratch on every call.
#[must_use]
pub fn attribute(timeline: &TicketTimeline, calendar: &BusinessCalendar) -> AttributionResult {
    let mut result = AttributionResult::default();
    let mut last_instant = timeline.creation();
    let mut owner = Owner::Customer;

    for event in timeline.events() {
        let next_owner = Owner::from_classification(event.classification);
        let bucket = match next_owner {
            Some(_) => owner.credited_bucket(),
            None => Classification::Ignored,
        };
        accumulate(&mut result, bucket, calendar, last_instant, event.timestamp);
        if let Some(next) = next_owner {
            owner = next;
        }
        last_instant = event.timestamp;
    }

    accumulate(
        &mut result,
        owner.credited_bucket(),
        calendar,
        last_instant,
        timeline.final_instant(),
    );

    tracing::debug!(
        wall = result.wall_total(),
        business = result.business_total(),
        "replay complete"
    );
    result
}

fn accumulate(
    result: &mut AttributionResult,
    bucket: Classification,
    calendar: &BusinessCalendar,
    from: NaiveDateTime,
    to: NaiveDateTime,
) {
    if to <= from {
        return;
    }
    let totals = result.bucket_mut(bucket);
    totals.wall_seconds += seconds_between(from, to);
    totals.business_seconds += calendar.business_seconds_between(from, to);
}
