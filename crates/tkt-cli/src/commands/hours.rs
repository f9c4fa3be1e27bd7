//! Hours command: show the effective weekly schedule and holidays.

use anyhow::Result;

use crate::config::Config;

/// Runs the hours command. The calendar has already been validated by the
/// time this runs; this prints the configuration as the user wrote it.
pub fn run(config: &Config) -> Result<()> {
    let hours = &config.hours;
    let days = [
        ("Monday", &hours.monday),
        ("Tuesday", &hours.tuesday),
        ("Wednesday", &hours.wednesday),
        ("Thursday", &hours.thursday),
        ("Friday", &hours.friday),
        ("Saturday", &hours.saturday),
        ("Sunday", &hours.sunday),
    ];

    println!("BUSINESS HOURS");
    for (name, ranges) in days {
        let display = if ranges.trim().is_empty() {
            "(closed)"
        } else {
            ranges.as_str()
        };
        println!("  {name:<10} {display}");
    }

    println!();
    if config.holidays.is_empty() {
        println!("No holidays configured.");
    } else {
        println!("HOLIDAYS");
        let mut holidays = config.holidays.clone();
        holidays.sort_by_key(|entry| entry.date);
        for entry in holidays {
            if entry.label.is_empty() {
                println!("  {}", entry.date);
            } else {
                println!("  {}  {}", entry.date, entry.label);
            }
        }
    }
    Ok(())
}
