use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt::Display;

/// Form date format used by the portal (`dd/mm/yyyy`)
const FORM_DATE_FORMAT: &str = "%d/%m/%Y";

/// Inclusive report period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Report period for a run on `today`.
    ///
    /// The period ends yesterday. When yesterday is a Sunday the period
    /// starts on Saturday so the weekend is covered by Monday's run.
    pub fn for_run_on(today: NaiveDate) -> Self {
        let end = today - Duration::days(1);
        let start = if end.weekday() == Weekday::Sun {
            end - Duration::days(1)
        } else {
            end
        };
        Self { start, end }
    }

    /// Report period for a run today (local time)
    pub fn yesterday() -> Self {
        Self::for_run_on(chrono::Local::now().date_naive())
    }

    pub fn start_text(&self) -> String {
        self.start.format(FORM_DATE_FORMAT).to_string()
    }

    pub fn end_text(&self) -> String {
        self.end.format(FORM_DATE_FORMAT).to_string()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start_text(), self.end_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_run_covers_saturday_and_sunday() {
        let range = DateRange::for_run_on(date(2026, 10, 19));
        assert_eq!(range.start, date(2026, 10, 17));
        assert_eq!(range.end, date(2026, 10, 18));
    }

    #[test]
    fn weekday_run_covers_only_yesterday() {
        let range = DateRange::for_run_on(date(2025, 1, 1));
        assert_eq!(range.start, date(2024, 12, 31));
        assert_eq!(range.end, date(2024, 12, 31));
    }

    #[test]
    fn sunday_run_covers_saturday_only() {
        let range = DateRange::for_run_on(date(2024, 3, 3));
        assert_eq!(range.start, date(2024, 3, 2));
        assert_eq!(range.end, date(2024, 3, 2));
    }

    #[test]
    fn rule_holds_for_a_whole_year() {
        let mut today = date(2025, 1, 1);
        while today < date(2026, 1, 1) {
            let range = DateRange::for_run_on(today);
            let yesterday = today - Duration::days(1);
            assert_eq!(range.end, yesterday);
            if yesterday.weekday() == Weekday::Sun {
                assert_eq!(range.start, today - Duration::days(2));
            } else {
                assert_eq!(range.start, yesterday);
            }
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn form_text_is_day_month_year() {
        let range = DateRange::for_run_on(date(2024, 3, 4));
        assert_eq!(range.start_text(), "02/03/2024");
        assert_eq!(range.end_text(), "03/03/2024");
        assert_eq!(range.to_string(), "02/03/2024 - 03/03/2024");
    }
}
