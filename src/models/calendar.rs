//! Calendar models: holidays and date ranges.
//!
//! This module contains the [`PublicHoliday`] type used by tenant
//! configuration and the [`DateRange`] used by list filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A holiday observed by a tenant.
///
/// Holidays trigger the holiday surcharge in the delivery rate calculators.
///
/// # Example
///
/// ```
/// use bizhub::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2026, 12, 25).unwrap(),
///     name: "Christmas Day".to_string(),
///     region: "national".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
    /// The region where this holiday applies.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "national".to_string()
}

/// An inclusive date range with optional bounds.
///
/// A missing bound is open: `DateRange { from: None, to: None }` matches
/// every date.
///
/// # Example
///
/// ```
/// use bizhub::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange {
///     from: Some(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap()),
///     to: Some(NaiveDate::from_ymd_opt(2026, 1, 26).unwrap()),
/// };
///
/// assert!(range.contains_date(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap())); // start date
/// assert!(range.contains_date(NaiveDate::from_ymd_opt(2026, 1, 26).unwrap())); // end date
/// assert!(!range.contains_date(NaiveDate::from_ymd_opt(2026, 1, 27).unwrap())); // after
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// The first date in the range (inclusive).
    pub from: Option<NaiveDate>,
    /// The last date in the range (inclusive).
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Checks if a given date falls within this range.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Returns true if the bounds are inverted.
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_holiday_region_defaults_to_national() {
        let json = r#"{"date": "2026-12-25", "name": "Christmas Day"}"#;
        let holiday: PublicHoliday = serde_json::from_str(json).unwrap();
        assert_eq!(holiday.region, "national");
        assert_eq!(holiday.date, date(2026, 12, 25));
    }

    #[test]
    fn test_open_range_matches_everything() {
        let range = DateRange::default();
        assert!(range.contains_date(date(1999, 1, 1)));
        assert!(range.contains_date(date(2099, 12, 31)));
    }

    #[test]
    fn test_half_open_ranges() {
        let from_only = DateRange {
            from: Some(date(2026, 3, 1)),
            to: None,
        };
        assert!(!from_only.contains_date(date(2026, 2, 28)));
        assert!(from_only.contains_date(date(2030, 1, 1)));

        let to_only = DateRange {
            from: None,
            to: Some(date(2026, 3, 1)),
        };
        assert!(to_only.contains_date(date(2026, 3, 1)));
        assert!(!to_only.contains_date(date(2026, 3, 2)));
    }

    #[test]
    fn test_inverted_range_detected() {
        let range = DateRange {
            from: Some(date(2026, 3, 2)),
            to: Some(date(2026, 3, 1)),
        };
        assert!(range.is_inverted());
        assert!(!DateRange::default().is_inverted());
    }
}
