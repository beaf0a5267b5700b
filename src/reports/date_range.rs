// src/reports/date_range.rs

use chrono::{DateTime, Duration, Months, Utc};

/// Named trailing windows accepted by the branch day-wise report.
///
/// All windows are half-open `[start, now)` and anchored at the exact
/// request time: 7 days, 21 days, 1 calendar month, 3 calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    PastWeek,
    PastThreeWeeks,
    PastMonth,
    PastQuarter,
}

impl DateRange {
    /// Parses a caller-supplied label, case-insensitively. Unknown labels
    /// are a hard `None`, never a default window.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "past week" => Some(Self::PastWeek),
            "past 3 weeks" => Some(Self::PastThreeWeeks),
            "past month" => Some(Self::PastMonth),
            "past quarter" => Some(Self::PastQuarter),
            _ => None,
        }
    }

    pub fn resolve(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = match self {
            Self::PastWeek => now - Duration::days(7),
            Self::PastThreeWeeks => now - Duration::days(21),
            Self::PastMonth => now - Months::new(1),
            Self::PastQuarter => now - Months::new(3),
        };
        (start, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(DateRange::parse("Past Week"), Some(DateRange::PastWeek));
        assert_eq!(
            DateRange::parse("  past 3 weeks "),
            Some(DateRange::PastThreeWeeks)
        );
        assert_eq!(DateRange::parse("PAST QUARTER"), Some(DateRange::PastQuarter));
    }

    #[test]
    fn unknown_label_never_resolves() {
        assert_eq!(DateRange::parse("past year"), None);
        assert_eq!(DateRange::parse(""), None);
    }

    #[test]
    fn resolve_is_pure() {
        let now = fixed_now();
        assert_eq!(
            DateRange::PastMonth.resolve(now),
            DateRange::PastMonth.resolve(now)
        );
    }

    #[test]
    fn past_week_spans_exactly_seven_days() {
        let (start, end) = DateRange::PastWeek.resolve(fixed_now());
        assert_eq!(end - start, Duration::days(7));
        assert_eq!(end, fixed_now());
    }

    #[test]
    fn past_three_weeks_spans_exactly_twenty_one_days() {
        let (start, end) = DateRange::PastThreeWeeks.resolve(fixed_now());
        assert_eq!(end - start, Duration::days(21));
    }

    #[test]
    fn month_windows_use_calendar_months() {
        let (start, _) = DateRange::PastMonth.resolve(fixed_now());
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 15, 10, 30, 0).unwrap());

        let (start, _) = DateRange::PastQuarter.resolve(fixed_now());
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 12, 15, 10, 30, 0).unwrap());
    }
}
