//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tkt_core::{BusinessCalendar, CalendarError, HolidaySet, WeeklySchedule};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Business hours per weekday.
    #[serde(default)]
    pub hours: HoursConfig,

    /// Dates wholly excluded from business time.
    #[serde(default)]
    pub holidays: Vec<HolidayEntry>,
}

/// Comma-separated `"HH:MM-HH:MM"` ranges per weekday; an empty string means
/// the day is closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoursConfig {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

/// One excluded date, with a display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub label: String,
}

impl Default for HoursConfig {
    fn default() -> Self {
        let weekday = "08:00-12:00,14:00-18:00".to_string();
        Self {
            monday: weekday.clone(),
            tuesday: weekday.clone(),
            wednesday: weekday.clone(),
            thursday: weekday.clone(),
            friday: weekday,
            saturday: String::new(),
            sunday: String::new(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TKT_*)
        figment = figment.merge(Env::prefixed("TKT_"));

        figment.extract()
    }

    /// Builds the immutable calendar from this configuration.
    ///
    /// The calendar is rebuilt from scratch whenever configuration changes;
    /// malformed range strings fail here instead of silently defaulting to
    /// always-open or always-closed.
    pub fn calendar(&self) -> Result<BusinessCalendar, CalendarError> {
        let hours = &self.hours;
        let days = [
            hours.monday.as_str(),
            hours.tuesday.as_str(),
            hours.wednesday.as_str(),
            hours.thursday.as_str(),
            hours.friday.as_str(),
            hours.saturday.as_str(),
            hours.sunday.as_str(),
        ];
        let schedule = WeeklySchedule::parse(&days)?;
        let holidays = HolidaySet::new(self.holidays.iter().map(|entry| entry.date));
        Ok(BusinessCalendar::new(schedule, holidays))
    }
}

/// Returns the platform-specific config directory for tkt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tkt"))
}
