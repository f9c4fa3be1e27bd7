//! Report formatting for attribution results.
//!
//! The core returns raw seconds; everything human-readable happens here.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use tkt_core::{BucketTotals, TicketAnalysis, TicketFailure};

/// Formats seconds as `HH:MM:SS`, or `D days, HH:MM:SS` past 24 hours.
/// Negative inputs are treated as zero.
#[allow(clippy::cast_possible_truncation)]
pub fn format_seconds(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as i64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        format!("{days} {unit}, {hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    }
}

fn write_bucket_line(output: &mut String, label: &str, totals: &BucketTotals) {
    writeln!(
        output,
        "  {label:<10}{:>20}{:>20}",
        format_seconds(totals.wall_seconds),
        format_seconds(totals.business_seconds)
    )
    .unwrap();
}

/// Renders one ticket's attribution block.
pub fn format_analysis(analysis: &TicketAnalysis) -> String {
    let mut output = String::new();

    let protocol = analysis.protocol.as_deref().unwrap_or("-");
    let subject = analysis.subject.as_deref().unwrap_or("(no subject)");
    writeln!(output, "#{}  {protocol}  {subject}", analysis.id).unwrap();
    let state = if analysis.closed { "closed" } else { "open" };
    writeln!(output, "  {state}, {} events", analysis.events).unwrap();

    writeln!(output, "  {:<10}{:>20}{:>20}", "bucket", "wall", "business").unwrap();
    let result = &analysis.result;
    write_bucket_line(&mut output, "Customer", &result.customer);
    write_bucket_line(&mut output, "Support", &result.support);
    write_bucket_line(&mut output, "Bug", &result.bug);
    write_bucket_line(&mut output, "Ignored", &result.ignored);
    write_bucket_line(
        &mut output,
        "Total",
        &BucketTotals {
            wall_seconds: result.wall_total(),
            business_seconds: result.business_total(),
        },
    );

    output
}

/// Renders the human-readable batch report.
pub fn format_report(analyses: &[TicketAnalysis], failures: &[TicketFailure]) -> String {
    let mut output = String::new();

    let ticket_word = if analyses.len() == 1 { "ticket" } else { "tickets" };
    let failure_word = if failures.len() == 1 { "failure" } else { "failures" };
    writeln!(
        output,
        "TICKET ANALYSIS: {} {ticket_word}, {} {failure_word}",
        analyses.len(),
        failures.len()
    )
    .unwrap();

    for analysis in analyses {
        writeln!(output).unwrap();
        output.push_str(&format_analysis(analysis));
    }

    if !failures.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "SKIPPED").unwrap();
        for failure in failures {
            writeln!(output, "  #{}: {}", failure.id, failure.error).unwrap();
        }
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tickets: &'a [TicketAnalysis],
    pub failures: Vec<JsonFailure>,
}

#[derive(Debug, Serialize)]
pub struct JsonFailure {
    pub id: i64,
    pub error: String,
}

/// Formats the batch outcome as JSON.
pub fn format_report_json(
    analyses: &[TicketAnalysis],
    failures: &[TicketFailure],
) -> Result<String> {
    let report = JsonReport {
        tickets: analyses,
        failures: failures
            .iter()
            .map(|failure| JsonFailure {
                id: failure.id,
                error: failure.error.to_string(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use tkt_core::{AttributionResult, TimelineError};

    #[test]
    fn format_seconds_within_a_day() {
        assert_snapshot!(format_seconds(0.0), @"00:00:00");
        assert_snapshot!(format_seconds(59.0), @"00:00:59");
        assert_snapshot!(format_seconds(7200.0), @"02:00:00");
        assert_snapshot!(format_seconds(7325.0), @"02:02:05");
        assert_snapshot!(format_seconds(86_399.0), @"23:59:59");
    }

    #[test]
    fn format_seconds_spanning_days() {
        assert_snapshot!(format_seconds(86_400.0), @"1 day, 00:00:00");
        assert_snapshot!(format_seconds(97_200.0), @"1 day, 03:00:00");
        assert_snapshot!(format_seconds(230_400.0), @"2 days, 16:00:00");
    }

    #[test]
    fn format_seconds_rounds_to_whole_seconds() {
        assert_snapshot!(format_seconds(1.4), @"00:00:01");
        assert_snapshot!(format_seconds(1.5), @"00:00:02");
    }

    #[test]
    fn format_seconds_clamps_negative_input() {
        assert_snapshot!(format_seconds(-42.0), @"00:00:00");
    }

    fn sample_analysis() -> TicketAnalysis {
        TicketAnalysis {
            id: 42,
            protocol: Some("P-042".to_string()),
            subject: Some("Printer on fire".to_string()),
            closed: true,
            events: 3,
            result: AttributionResult {
                customer: BucketTotals {
                    wall_seconds: 97_200.0,
                    business_seconds: 32_400.0,
                },
                support: BucketTotals {
                    wall_seconds: 14_400.0,
                    business_seconds: 14_400.0,
                },
                bug: BucketTotals::default(),
                ignored: BucketTotals::default(),
            },
        }
    }

    #[test]
    fn analysis_block_shows_every_bucket() {
        let output = format_analysis(&sample_analysis());

        assert!(output.contains("#42  P-042  Printer on fire"));
        assert!(output.contains("closed, 3 events"));
        assert!(output.contains("Customer"));
        assert!(output.contains("1 day, 03:00:00"));
        assert!(output.contains("09:00:00"));
        assert!(output.contains("04:00:00"));
        // Total = 97200 + 14400 wall.
        assert!(output.contains("1 day, 07:00:00"));
    }

    #[test]
    fn report_counts_tickets_and_failures() {
        let failures = vec![TicketFailure {
            id: 7,
            error: TimelineError::MissingCreation,
        }];
        let output = format_report(&[sample_analysis()], &failures);

        assert!(output.starts_with("TICKET ANALYSIS: 1 ticket, 1 failure"));
        assert!(output.contains("SKIPPED"));
        assert!(output.contains("#7: ticket has no parseable creation timestamp"));
    }

    #[test]
    fn json_report_carries_buckets_and_failures() {
        let failures = vec![TicketFailure {
            id: 7,
            error: TimelineError::MissingCreation,
        }];
        let json = format_report_json(&[sample_analysis()], &failures).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tickets"][0]["id"], 42);
        assert_eq!(
            value["tickets"][0]["result"]["support"]["wall_seconds"],
            14_400.0
        );
        assert_eq!(value["failures"][0]["id"], 7);
        assert!(
            value["failures"][0]["error"]
                .as_str()
                .unwrap()
                .contains("creation timestamp")
        );
    }
}
