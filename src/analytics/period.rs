//! Reporting periods and time bucketing.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::domain::types::{TypeConstraintError, string_enum};

string_enum! {
    /// Predefined reporting windows, all ending today.
    PeriodPreset {
        Today => "today",
        Last7Days => "7d",
        Last30Days => "30d",
        Last90Days => "90d",
        ThisMonth => "month",
    }
}

/// Longest custom window, in days.
pub const MAX_CUSTOM_DAYS: i64 = 3653;

/// Half-open `[start, end)` window of timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Whole days `from..=to`.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Result<Self, TypeConstraintError> {
        if to < from {
            return Err(TypeConstraintError::InvalidValue(
                "period ends before it starts".to_string(),
            ));
        }
        let end = to.succ_opt().ok_or_else(|| {
            TypeConstraintError::InvalidValue("period ends outside the calendar".to_string())
        })?;
        Ok(Self {
            start: from.and_time(NaiveTime::MIN),
            end: end.and_time(NaiveTime::MIN),
        })
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Number of calendar days covered.
    pub fn days(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days()
    }

    /// First day in the window.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last day in the window (inclusive).
    pub fn last_day(&self) -> NaiveDate {
        (self.end - Duration::nanoseconds(1)).date()
    }
}

/// A reporting period chosen on a report screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Preset(PeriodPreset),
    Custom { from: NaiveDate, to: NaiveDate },
}

impl Default for Period {
    fn default() -> Self {
        Period::Preset(PeriodPreset::Last30Days)
    }
}

impl Period {
    /// Reads the `period`/`from`/`to` query parameters.
    ///
    /// Both custom dates win over a preset; a missing or blank preset falls
    /// back to the last 30 days. Custom windows span at most
    /// [`MAX_CUSTOM_DAYS`].
    pub fn parse(
        period: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self, TypeConstraintError> {
        if let (Some(from), Some(to)) = (from, to) {
            let range = DateRange::from_dates(from, to)?;
            if range.days() > MAX_CUSTOM_DAYS {
                return Err(TypeConstraintError::InvalidValue(
                    "period is longer than ten years".to_string(),
                ));
            }
            return Ok(Period::Custom { from, to });
        }
        match period.map(str::trim).filter(|p| !p.is_empty()) {
            None | Some("custom") => Ok(Period::default()),
            Some(value) => Ok(Period::Preset(value.parse()?)),
        }
    }

    /// Resolves the period relative to `today`.
    pub fn range(&self, today: NaiveDate) -> DateRange {
        let from = match self {
            Period::Custom { from, to } => {
                return DateRange::from_dates(*from, *to).unwrap_or(DateRange {
                    start: from.and_time(NaiveTime::MIN),
                    end: from.and_time(NaiveTime::MIN),
                });
            }
            Period::Preset(PeriodPreset::Today) => today,
            Period::Preset(PeriodPreset::Last7Days) => today - Duration::days(6),
            Period::Preset(PeriodPreset::Last30Days) => today - Duration::days(29),
            Period::Preset(PeriodPreset::Last90Days) => today - Duration::days(89),
            Period::Preset(PeriodPreset::ThisMonth) => today.with_day(1).unwrap_or(today),
        };
        DateRange {
            start: from.and_time(NaiveTime::MIN),
            end: (today + Duration::days(1)).and_time(NaiveTime::MIN),
        }
    }

    /// Value echoed back to the period selector.
    pub fn key(&self) -> &'static str {
        match self {
            Period::Preset(preset) => preset.as_str(),
            Period::Custom { .. } => "custom",
        }
    }
}

string_enum! {
    /// Width of a timeline bucket.
    Granularity {
        Day => "day",
        Week => "week",
        Month => "month",
    }
}

impl Granularity {
    /// Days for windows up to a month, ISO weeks up to ~4 months, months beyond.
    pub fn for_range(range: &DateRange) -> Self {
        match range.days() {
            days if days <= 31 => Granularity::Day,
            days if days <= 120 => Granularity::Week,
            _ => Granularity::Month,
        }
    }

    /// First day of the bucket containing `day`.
    pub fn bucket_start(self, day: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => day,
            Granularity::Week => day - Duration::days(i64::from(day.weekday().num_days_from_monday())),
            Granularity::Month => day.with_day(1).unwrap_or(day),
        }
    }

    fn next(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => start.checked_add_signed(Duration::days(1)),
            Granularity::Week => start.checked_add_signed(Duration::days(7)),
            Granularity::Month => start.checked_add_months(Months::new(1)),
        }
    }

    /// Display label: `YYYY-MM-DD`, `YYYY-Www` (ISO week) or `YYYY-MM`.
    pub fn label(self, day: NaiveDate) -> String {
        let start = self.bucket_start(day);
        match self {
            Granularity::Day => start.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Month => start.format("%Y-%m").to_string(),
        }
    }

    /// Labels of every bucket overlapping `range`, in order.
    pub fn labels(self, range: &DateRange) -> Vec<String> {
        let last = range.last_day();
        let mut labels = Vec::new();
        let mut cursor = Some(self.bucket_start(range.first_day()));
        while let Some(start) = cursor {
            if start > last || range.start >= range.end {
                break;
            }
            labels.push(self.label(start));
            cursor = self.next(start);
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn presets_end_at_the_start_of_tomorrow() {
        let today = date(2025, 3, 15);
        let range = Period::Preset(PeriodPreset::Last7Days).range(today);
        assert_eq!(range.first_day(), date(2025, 3, 9));
        assert_eq!(range.last_day(), today);
        assert_eq!(range.days(), 7);

        let month = Period::Preset(PeriodPreset::ThisMonth).range(today);
        assert_eq!(month.first_day(), date(2025, 3, 1));

        let single = Period::Preset(PeriodPreset::Today).range(today);
        assert_eq!(single.days(), 1);
        assert!(single.contains(today.and_hms_opt(23, 59, 59).unwrap()));
        assert!(!single.contains(date(2025, 3, 16).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn parse_prefers_custom_dates_and_defaults_to_30_days() {
        assert_eq!(Period::parse(None, None, None), Ok(Period::default()));
        assert_eq!(
            Period::parse(Some("7d"), None, None),
            Ok(Period::Preset(PeriodPreset::Last7Days))
        );
        assert_eq!(
            Period::parse(Some("7d"), Some(date(2025, 1, 1)), Some(date(2025, 1, 31))),
            Ok(Period::Custom {
                from: date(2025, 1, 1),
                to: date(2025, 1, 31)
            })
        );
        assert!(Period::parse(Some("year"), None, None).is_err());
        assert!(Period::parse(None, Some(date(2025, 2, 1)), Some(date(2025, 1, 1))).is_err());
    }

    #[test]
    fn parse_rejects_dates_at_the_calendar_edge_and_overlong_spans() {
        assert!(Period::parse(None, Some(date(2025, 1, 1)), Some(NaiveDate::MAX)).is_err());
        assert!(Period::parse(None, Some(NaiveDate::MAX), Some(NaiveDate::MAX)).is_err());
        assert!(Period::parse(None, Some(date(2015, 1, 1)), Some(date(2025, 1, 1))).is_err());
        assert!(Period::parse(None, Some(date(2016, 1, 1)), Some(date(2025, 12, 31))).is_ok());
    }

    #[test]
    fn granularity_follows_range_length() {
        let today = date(2025, 6, 30);
        assert_eq!(
            Granularity::for_range(&Period::Preset(PeriodPreset::Last30Days).range(today)),
            Granularity::Day
        );
        assert_eq!(
            Granularity::for_range(&Period::Preset(PeriodPreset::Last90Days).range(today)),
            Granularity::Week
        );
        let year = DateRange::from_dates(date(2024, 7, 1), today).unwrap();
        assert_eq!(Granularity::for_range(&year), Granularity::Month);
    }

    #[test]
    fn weekly_labels_use_iso_weeks_starting_monday() {
        // 2025-01-01 is a Wednesday in ISO week 1.
        assert_eq!(Granularity::Week.bucket_start(date(2025, 1, 1)), date(2024, 12, 30));
        assert_eq!(Granularity::Week.label(date(2025, 1, 1)), "2025-W01");

        let range = DateRange::from_dates(date(2025, 1, 1), date(2025, 1, 14)).unwrap();
        assert_eq!(
            Granularity::Week.labels(&range),
            vec!["2025-W01", "2025-W02", "2025-W03"]
        );
    }

    #[test]
    fn labels_cover_every_bucket_of_the_range() {
        let range = DateRange::from_dates(date(2025, 1, 30), date(2025, 2, 2)).unwrap();
        assert_eq!(
            Granularity::Day.labels(&range),
            vec!["2025-01-30", "2025-01-31", "2025-02-01", "2025-02-02"]
        );
        let months = DateRange::from_dates(date(2024, 11, 15), date(2025, 1, 3)).unwrap();
        assert_eq!(
            Granularity::Month.labels(&months),
            vec!["2024-11", "2024-12", "2025-01"]
        );
    }
}
