//! Holiday calendar used to classify business days.
//!
//! The calendar is an externally supplied list of ISO dates. An empty
//! calendar is valid: only weekends are then treated as non-business days.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};

/// A set of non-business calendar dates.
///
/// # Example
///
/// ```
/// use chile_labor_engine::config::HolidayCalendar;
/// use chrono::NaiveDate;
///
/// let calendar = HolidayCalendar::from_iso_strings(&["2026-05-01", "2026-05-21"]);
/// assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2026, 5, 21).unwrap()));
///
/// // Friday 2026-05-22 is a business day, Saturday 2026-05-23 is not.
/// assert!(calendar.is_business_day(NaiveDate::from_ymd_opt(2026, 5, 22).unwrap()));
/// assert!(!calendar.is_business_day(NaiveDate::from_ymd_opt(2026, 5, 23).unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Creates a calendar from a collection of dates.
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Creates a calendar from ISO `YYYY-MM-DD` strings.
    ///
    /// Entries that do not parse are skipped with a warning rather than
    /// failing the whole calendar.
    pub fn from_iso_strings<S: AsRef<str>>(values: &[S]) -> Self {
        let dates = values.iter().filter_map(|value| {
            let value = value.as_ref().trim();
            match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(err) => {
                    warn!(value, error = %err, "Skipping malformed holiday date");
                    None
                }
            }
        });
        Self::new(dates)
    }

    /// Loads a calendar from a JSON file containing an array of ISO strings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigNotFound`] if the file cannot be read and
    /// [`EngineError::ConfigParseError`] if it is not a JSON string array.
    pub fn load_json<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let values: Vec<String> =
            serde_json::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self::from_iso_strings(&values))
    }

    /// Loads a calendar from a JSON file, or returns `fallback` if that fails.
    pub fn load_or_fallback<P: AsRef<Path>>(path: P, fallback: HolidayCalendar) -> Self {
        match Self::load_json(&path) {
            Ok(calendar) => {
                debug!(
                    path = %path.as_ref().display(),
                    holidays = calendar.len(),
                    "Holiday calendar loaded"
                );
                calendar
            }
            Err(err) => {
                warn!(error = %err, "Could not load holiday calendar, using fallback");
                fallback
            }
        }
    }

    /// Returns true if the date is listed as a holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Returns true if the date is neither a weekend day nor a holiday.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }

    /// Returns the number of holidays in the calendar.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the calendar lists no holidays.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates over the holidays in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

/// Returns true for Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
