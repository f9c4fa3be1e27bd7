//! Batch analysis over independent tickets.
//!
//! Tickets never depend on each other, so the batch fans out across a rayon
//! pool and a malformed ticket only costs its own entry.

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::Serialize;

use crate::attribution::{AttributionResult, attribute};
use crate::calendar::BusinessCalendar;
use crate::timeline::{RawTicket, TimelineError};

/// Attribution outcome for one ticket.
#[derive(Debug, Clone, Serialize)]
pub struct TicketAnalysis {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub closed: bool,
    pub events: usize,
    pub result: AttributionResult,
}

/// One failed ticket; the rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFailure {
    pub id: i64,
    pub error: TimelineError,
}

/// Analyzes a single ticket against the calendar.
pub fn analyze_ticket(
    ticket: &RawTicket,
    calendar: &BusinessCalendar,
    now: NaiveDateTime,
) -> Result<TicketAnalysis, TicketFailure> {
    let timeline = ticket.timeline(now).map_err(|error| TicketFailure {
        id: ticket.id,
        error,
    })?;
    tracing::debug!(ticket = ticket.id, events = timeline.events().len(), "replaying ticket");
    Ok(TicketAnalysis {
        id: ticket.id,
        protocol: ticket.protocol.clone(),
        subject: ticket.subject.clone(),
        closed: ticket.is_closed(),
        events: timeline.events().len(),
        result: attribute(&timeline, calendar),
    })
}

/// Analyzes every ticket in parallel, partitioning successes from failures.
///
/// Output order matches input order in each partition.
#[must_use]
pub fn analyze_batch(
    tickets: &[RawTicket],
    calendar: &BusinessCalendar,
    now: NaiveDateTime,
) -> (Vec<TicketAnalysis>, Vec<TicketFailure>) {
    let outcomes: Vec<_> = tickets
        .par_iter()
        .map(|ticket| analyze_ticket(ticket, calendar, now))
        .collect();

    let mut analyses = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(analysis) => analyses.push(analysis),
            Err(failure) => failures.push(failure),
        }
    }
    (analyses, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::RawReply;
    use chrono::NaiveDate;

    fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid test date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid test time")
    }

    fn weekday_calendar() -> BusinessCalendar {
        let open = "08:00-12:00,14:00-18:00";
        BusinessCalendar::parse(&[open, open, open, open, open, "", ""], [])
            .expect("valid test calendar")
    }

    fn closed_ticket(id: i64) -> RawTicket {
        RawTicket {
            id,
            protocol: Some(format!("P-{id:03}")),
            subject: None,
            creation_date: Some("2025-03-03 09:00:00".to_string()),
            end_date: Some("2025-03-03 16:00:00".to_string()),
            situation: None,
            replies: vec![RawReply {
                id: None,
                date: "2025-03-03 11:00:00".to_string(),
                sender_type: "A".to_string(),
                classification: None,
            }],
        }
    }

    #[test]
    fn batch_analyzes_every_ticket() {
        let tickets = vec![closed_ticket(1), closed_ticket(2), closed_ticket(3)];
        let (analyses, failures) =
            analyze_batch(&tickets, &weekday_calendar(), dt(2025, 3, 10, 0, 0));

        assert_eq!(analyses.len(), 3);
        assert!(failures.is_empty());
        assert_eq!(
            analyses.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for analysis in &analyses {
            assert!(analysis.closed);
            assert_eq!(analysis.events, 2);
        }
    }

    #[test]
    fn one_bad_ticket_does_not_abort_the_batch() {
        let mut bad = closed_ticket(2);
        bad.creation_date = None;
        let tickets = vec![closed_ticket(1), bad, closed_ticket(3)];

        let (analyses, failures) =
            analyze_batch(&tickets, &weekday_calendar(), dt(2025, 3, 10, 0, 0));

        assert_eq!(analyses.len(), 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id, 2);
        assert_eq!(failures[0].error, TimelineError::MissingCreation);
    }

    #[test]
    fn analysis_carries_ticket_identity() {
        let analysis = analyze_ticket(
            &closed_ticket(7),
            &weekday_calendar(),
            dt(2025, 3, 10, 0, 0),
        )
        .unwrap();

        assert_eq!(analysis.id, 7);
        assert_eq!(analysis.protocol.as_deref(), Some("P-007"));
        // 09:00-11:00 waits on support; after support's reply, 11:00-16:00
        // waits on the customer.
        let result = analysis.result;
        assert!((result.support.wall_seconds - 7200.0).abs() < 1e-6);
        assert!((result.customer.wall_seconds - 18000.0).abs() < 1e-6);
    }
}
