//! Check command: wall and business time between two instants.

use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use tkt_core::{BusinessCalendar, parse_vendor_timestamp};

use crate::report::format_seconds;

/// Runs the check command.
pub fn run(calendar: &BusinessCalendar, start: &str, end: &str) -> Result<()> {
    let start = parse_instant(start)?;
    let end = parse_instant(end)?;

    print_endpoint(calendar, "Start", start);
    print_endpoint(calendar, "End", end);

    let business = calendar.business_seconds_between(start, end);

    println!("Wall time:     {}", format_seconds(wall_seconds(start, end)));
    println!("Business time: {}", format_seconds(business));
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn wall_seconds(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    if end > start {
        (end - start).num_milliseconds() as f64 / 1000.0
    } else {
        0.0
    }
}

fn print_endpoint(calendar: &BusinessCalendar, label: &str, instant: NaiveDateTime) {
    let state = if calendar.is_open(instant) {
        "open"
    } else {
        "closed"
    };
    println!("{label:<5} {} ({state})", instant.format("%Y-%m-%d %H:%M:%S"));
}

fn parse_instant(raw: &str) -> Result<NaiveDateTime> {
    parse_vendor_timestamp(raw).ok_or_else(|| anyhow!("unparseable instant {raw:?}"))
}
