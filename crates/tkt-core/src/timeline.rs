//! Ticket event timelines and vendor record ingestion.
//!
//! The vendor API hands back tickets with a creation timestamp, an optional
//! closing timestamp, a situation code, and a list of replies tagged with
//! single-character sender codes. This module normalizes those records into a
//! [`TicketTimeline`]: the synthetic creation event plus every reply, in
//! chronological order, with a final instant to close the last interval.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Classification, Party};

/// Vendor situation ids that mark a ticket terminal (cancelled, finished).
const TERMINAL_SITUATIONS: [i64; 2] = [4, 5];

/// Per-ticket ingestion and timeline errors.
///
/// These abort the affected ticket only; a batch of tickets is processed
/// independently and survives any one of them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// No parseable creation timestamp. Without the anchor, every interval
    /// in the replay would be meaningless, so the whole ticket is rejected
    /// rather than reported as zero.
    #[error("ticket has no parseable creation timestamp")]
    MissingCreation,

    /// A reply or closing timestamp could not be parsed.
    #[error("unparseable timestamp {raw:?}")]
    UnparseableTimestamp { raw: String },

    /// A reply carried a sender code other than `C` or `A`.
    #[error("unknown sender code {code:?}")]
    UnknownSender { code: String },

    /// A reclassified record carried a code outside `C`/`A`/`B`/`I`.
    #[error("unknown classification code {code:?}")]
    UnknownClassification { code: String },

    /// A reply predates the ticket's creation instant.
    #[error("event at {event} predates ticket creation at {creation}")]
    EventBeforeCreation {
        event: NaiveDateTime,
        creation: NaiveDateTime,
    },

    /// Reclassification targeted an event index that does not exist.
    #[error("no event at index {index} ({len} events)")]
    NoSuchEvent { index: usize, len: usize },
}

/// Whether an event is the synthetic creation marker or a real reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    Creation,
    Reply,
}

/// One point at which a ticket changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketEvent {
    /// Offset-stripped wall-clock instant, whole seconds.
    pub timestamp: NaiveDateTime,
    /// Who actually sent the message. Never changes after ingestion.
    pub original_party: Party,
    /// Current bucket assignment; starts equal to `original_party`.
    pub classification: Classification,
    pub origin: EventOrigin,
}

impl TicketEvent {
    /// A real reply, initially classified as its sender.
    #[must_use]
    pub fn reply(timestamp: NaiveDateTime, party: Party) -> Self {
        Self {
            timestamp,
            original_party: party,
            classification: party.into(),
            origin: EventOrigin::Reply,
        }
    }

    /// The synthetic creation event. Tickets are opened by the customer.
    #[must_use]
    pub fn creation(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            original_party: Party::Customer,
            classification: Classification::Customer,
            origin: EventOrigin::Creation,
        }
    }
}

/// A ticket's ordered event sequence plus the instant that closes the last
/// interval: the closing timestamp for finished tickets, a caller-supplied
/// "now" for open ones. The core never reads the clock itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTimeline {
    creation: NaiveDateTime,
    events: Vec<TicketEvent>,
    final_instant: NaiveDateTime,
}

impl TicketTimeline {
    /// Assembles a timeline from the creation instant and the real replies.
    ///
    /// Events are stably sorted by timestamp: events sharing a timestamp keep
    /// their input (API) order, and the synthetic creation event precedes any
    /// reply at the same instant. That tie-break is part of this type's
    /// contract. Replies strictly before `creation` are rejected.
    ///
    /// `final_instant` may be earlier than the last event; the trailing
    /// interval is then empty, which is valid and yields zero trailing time.
    pub fn new(
        creation: NaiveDateTime,
        replies: Vec<TicketEvent>,
        final_instant: NaiveDateTime,
    ) -> Result<Self, TimelineError> {
        for event in &replies {
            if event.timestamp < creation {
                return Err(TimelineError::EventBeforeCreation {
                    event: event.timestamp,
                    creation,
                });
            }
        }

        let mut events = Vec::with_capacity(replies.len() + 1);
        events.push(TicketEvent::creation(creation));
        events.extend(replies);
        events.sort_by_key(|event| event.timestamp);

        Ok(Self {
            creation,
            events,
            final_instant,
        })
    }

    #[must_use]
    pub const fn creation(&self) -> NaiveDateTime {
        self.creation
    }

    #[must_use]
    pub const fn final_instant(&self) -> NaiveDateTime {
        self.final_instant
    }

    /// All events in replay order, the creation event included.
    #[must_use]
    pub fn events(&self) -> &[TicketEvent] {
        &self.events
    }

    /// A copy with the event at `index` reassigned.
    ///
    /// Reclassification never edits a timeline in place: replays always run
    /// against immutable snapshots, so a recomputation racing a user edit
    /// cannot observe a half-updated sequence.
    pub fn with_classification(
        &self,
        index: usize,
        classification: Classification,
    ) -> Result<Self, TimelineError> {
        let mut next = self.clone();
        let len = next.events.len();
        let event = next
            .events
            .get_mut(index)
            .ok_or(TimelineError::NoSuchEvent { index, len })?;
        event.classification = classification;
        Ok(next)
    }
}

/// Reply record as the vendor API returns it. Fetching is not this crate's
/// concern; records arrive as plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReply {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: String,
    pub sender_type: String,
    /// Manual reassignment code, present only on records that went through
    /// reclassification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

/// The vendor's situation block: a status code with the instant it applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSituation {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_date: Option<String>,
}

/// A ticket record as fetched from the vendor API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTicket {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation: Option<RawSituation>,
    #[serde(default)]
    pub replies: Vec<RawReply>,
}

impl RawTicket {
    /// Whether the ticket is finished: it has a closing timestamp or a
    /// terminal situation code.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        non_empty(self.end_date.as_deref()).is_some()
            || self
                .situation
                .as_ref()
                .is_some_and(|situation| TERMINAL_SITUATIONS.contains(&situation.id))
    }

    /// Builds the replay timeline for this ticket.
    ///
    /// `now` closes the trailing interval of still-open tickets; closed
    /// tickets use their closing instant (end date, else the terminal
    /// situation's apply date, else the last reply).
    pub fn timeline(&self, now: NaiveDateTime) -> Result<TicketTimeline, TimelineError> {
        let creation = non_empty(self.creation_date.as_deref())
            .and_then(parse_vendor_timestamp)
            .ok_or(TimelineError::MissingCreation)?;

        let mut replies = Vec::with_capacity(self.replies.len());
        for reply in &self.replies {
            let timestamp = parse_vendor_timestamp(&reply.date).ok_or_else(|| {
                TimelineError::UnparseableTimestamp {
                    raw: reply.date.clone(),
                }
            })?;
            let party = Party::from_code(&reply.sender_type).ok_or_else(|| {
                TimelineError::UnknownSender {
                    code: reply.sender_type.clone(),
                }
            })?;
            let mut event = TicketEvent::reply(timestamp, party);
            if let Some(code) = &reply.classification {
                event.classification = Classification::from_code(code).ok_or_else(|| {
                    TimelineError::UnknownClassification { code: code.clone() }
                })?;
            }
            replies.push(event);
        }

        let final_instant = match self.closing_instant(&replies)? {
            Some(instant) => instant,
            None => now,
        };
        TicketTimeline::new(creation, replies, final_instant)
    }

    /// The closing instant of a finished ticket, or `None` for open tickets.
    fn closing_instant(
        &self,
        replies: &[TicketEvent],
    ) -> Result<Option<NaiveDateTime>, TimelineError> {
        if let Some(raw) = non_empty(self.end_date.as_deref()) {
            let parsed = parse_vendor_timestamp(raw).ok_or_else(|| {
                TimelineError::UnparseableTimestamp {
                    raw: raw.to_string(),
                }
            })?;
            return Ok(Some(parsed));
        }

        let terminal = self
            .situation
            .as_ref()
            .filter(|situation| TERMINAL_SITUATIONS.contains(&situation.id));
        if let Some(situation) = terminal {
            if let Some(raw) = non_empty(situation.apply_date.as_deref()) {
                let parsed = parse_vendor_timestamp(raw).ok_or_else(|| {
                    TimelineError::UnparseableTimestamp {
                        raw: raw.to_string(),
                    }
                })?;
                return Ok(Some(parsed));
            }
            // Terminal but undated: fall back to the last reply; an empty
            // ticket falls through to the caller's "now".
            return Ok(replies.iter().map(|event| event.timestamp).max());
        }

        Ok(None)
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a vendor timestamp, stripping any fixed UTC offset.
///
/// The wall-clock time is kept as-is (the offset is dropped, not applied)
/// and sub-second precision is truncated, so every instant the core sees is
/// uniformly normalized. Accepted shapes: `"YYYY-MM-DD HH:MM:SS"` with an
/// optional fraction or trailing offset, and RFC 3339.
#[must_use]
pub fn parse_vendor_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z")
                .map(|instant| instant.naive_local())
        })
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|instant| instant.naive_local()))
        .ok()?;
    parsed.with_nanosecond(0)
}
