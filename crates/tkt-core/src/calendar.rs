//! Business-hours calendar: weekly open windows plus excluded dates.
//!
//! A [`BusinessCalendar`] answers two questions: whether a given instant is
//! within business hours, and how many business seconds lie between two
//! instants. It is immutable once built; configuration changes produce a new
//! calendar (rebuild-and-swap), never an in-place edit while a calculation
//! may be using it.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

/// Errors raised while building a calendar from configuration.
///
/// Malformed configuration must fail loudly here: silently defaulting to
/// "always closed" or "always open" would mask the mistake in every
/// downstream total.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// A range string did not have the `HH:MM-HH:MM` shape.
    #[error("malformed time range {raw:?}: expected \"HH:MM-HH:MM\"")]
    MalformedRange { raw: String },

    /// A time-of-day component was not a valid `HH:MM`.
    #[error("invalid time of day {raw:?}")]
    InvalidTime { raw: String },

    /// A range ended at or before its start.
    #[error("time range {raw:?} must start before it ends")]
    EmptyRange { raw: String },

    /// Two ranges on the same weekday overlap.
    #[error("overlapping time ranges on {day}")]
    OverlappingRanges { day: Weekday },
}

/// One open-for-business window within a single day. `start < end` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, CalendarError> {
        if start >= end {
            return Err(CalendarError::EmptyRange {
                raw: format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
            });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(self) -> NaiveTime {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> NaiveTime {
        self.end
    }

    /// Inclusive on both endpoints: boundary instants count as open.
    fn contains(self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

impl FromStr for TimeInterval {
    type Err = CalendarError;

    /// Parses a single `"HH:MM-HH:MM"` range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (start, end) = raw.split_once('-').ok_or_else(|| CalendarError::MalformedRange {
            raw: raw.to_string(),
        })?;
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime, CalendarError> {
    let raw = raw.trim();
    let invalid = || CalendarError::InvalidTime {
        raw: raw.to_string(),
    };
    let (hours, minutes) = raw.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Open intervals per weekday, Monday through Sunday.
///
/// All seven days are always present; a day with no intervals has zero
/// business hours. Intervals within one day are kept sorted and must not
/// overlap (touching is allowed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<TimeInterval>; 7],
}

impl WeeklySchedule {
    pub fn new(mut days: [Vec<TimeInterval>; 7]) -> Result<Self, CalendarError> {
        for (index, intervals) in days.iter_mut().enumerate() {
            intervals.sort_by_key(|interval| interval.start);
            for pair in intervals.windows(2) {
                if pair[0].end > pair[1].start {
                    return Err(CalendarError::OverlappingRanges {
                        day: weekday_from_index(index),
                    });
                }
            }
        }
        Ok(Self { days })
    }

    /// Parses the seven per-weekday configuration strings, Monday first.
    ///
    /// Each string is a comma-separated list of `"HH:MM-HH:MM"` ranges; an
    /// empty string means the day is closed.
    pub fn parse(days: &[&str; 7]) -> Result<Self, CalendarError> {
        let mut parsed: [Vec<TimeInterval>; 7] = Default::default();
        for (index, raw) in days.iter().enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            parsed[index] = raw
                .split(',')
                .map(str::parse)
                .collect::<Result<Vec<_>, _>>()?;
        }
        Self::new(parsed)
    }

    #[must_use]
    pub fn intervals_for(&self, weekday: Weekday) -> &[TimeInterval] {
        &self.days[weekday.num_days_from_monday() as usize]
    }
}

const fn weekday_from_index(index: usize) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Calendar dates wholly excluded from business time, whatever the weekly
/// schedule says for their weekday. Duplicate dates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

/// A weekly schedule plus a holiday set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessCalendar {
    schedule: WeeklySchedule,
    holidays: HolidaySet,
}

impl BusinessCalendar {
    #[must_use]
    pub const fn new(schedule: WeeklySchedule, holidays: HolidaySet) -> Self {
        Self { schedule, holidays }
    }

    /// Builds a calendar straight from configuration data: seven per-weekday
    /// range strings (Monday first) and the excluded dates.
    pub fn parse(
        days: &[&str; 7],
        holidays: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<Self, CalendarError> {
        Ok(Self::new(WeeklySchedule::parse(days)?, HolidaySet::new(holidays)))
    }

    #[must_use]
    pub const fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    #[must_use]
    pub const fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Whether `instant` falls within business hours.
    ///
    /// Fails closed: holidays, empty weekdays, and instants outside every
    /// window return `false`. Window endpoints are inclusive. Total over all
    /// instants.
    #[must_use]
    pub fn is_open(&self, instant: NaiveDateTime) -> bool {
        let date = instant.date();
        if self.holidays.contains(date) {
            return false;
        }
        self.schedule
            .intervals_for(date.weekday())
            .iter()
            .any(|interval| interval.contains(instant.time()))
    }

    /// Business seconds between two instants. Returns `0.0` when
    /// `start >= end`; never negative, never an error.
    ///
    /// Walks day by day from `start.date()` through `end.date()` inclusive,
    /// skipping holidays and empty weekdays, and sums the positive overlap of
    /// each window with the clipped `[start, end]` range. The iteration count
    /// equals the number of calendar days spanned. No rounding happens here;
    /// callers round only when formatting.
    #[must_use]
    pub fn business_seconds_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        if start >= end {
            return 0.0;
        }

        let mut total = 0.0;
        let mut day = start.date();
        let last = end.date();
        while day <= last {
            if !self.holidays.contains(day) {
                for interval in self.schedule.intervals_for(day.weekday()) {
                    let clipped_start = day.and_time(interval.start()).max(start);
                    let clipped_end = day.and_time(interval.end()).min(end);
                    if clipped_end > clipped_start {
                        total += seconds_between(clipped_start, clipped_end);
                    }
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        total
    }
}

/// Elapsed seconds from `from` to `to`; callers guarantee `to >= from`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
