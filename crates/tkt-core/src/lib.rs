//! Core domain logic for the ticket time analyzer.
//!
//! This crate contains the fundamental types and logic for:
//! - Calendar: weekly business-hours windows and holiday exclusions
//! - Timeline: vendor ticket records turned into ordered event timelines
//! - Attribution: replaying ownership to split elapsed time into buckets

mod attribution;
mod batch;
pub mod calendar;
pub mod timeline;
pub mod types;

pub use attribution::{AttributionResult, BucketTotals, attribute};
pub use batch::{TicketAnalysis, TicketFailure, analyze_batch, analyze_ticket};
pub use calendar::{BusinessCalendar, CalendarError, HolidaySet, TimeInterval, WeeklySchedule};
pub use timeline::{
    RawReply, RawSituation, RawTicket, TicketEvent, TicketTimeline, TimelineError,
    parse_vendor_timestamp,
};
pub use types::{Classification, Party};
