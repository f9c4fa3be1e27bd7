//! Analyze command: attribute time for a file of ticket records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tkt_core::{BusinessCalendar, RawTicket, analyze_batch, parse_vendor_timestamp};

use crate::report;

/// Runs the analyze command.
///
/// `now` closes the trailing interval of still-open tickets; it defaults to
/// the local wall clock so the core itself stays clock-free.
pub fn run(calendar: &BusinessCalendar, file: &Path, json: bool, now: Option<&str>) -> Result<()> {
    let payload = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let tickets: Vec<RawTicket> = serde_json::from_str(&payload)
        .context("tickets file is not a JSON array of ticket records")?;
    tracing::debug!(count = tickets.len(), "loaded tickets");

    let now = match now {
        Some(raw) => parse_vendor_timestamp(raw)
            .ok_or_else(|| anyhow!("unparseable --now instant {raw:?}"))?,
        None => Local::now().naive_local(),
    };

    let (analyses, failures) = analyze_batch(&tickets, calendar, now);
    for failure in &failures {
        tracing::warn!(ticket = failure.id, error = %failure.error, "skipped ticket");
    }

    if json {
        println!("{}", report::format_report_json(&analyses, &failures)?);
    } else {
        print!("{}", report::format_report(&analyses, &failures));
    }
    Ok(())
}
