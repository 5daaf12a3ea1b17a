//! Upcoming-birthday window.
//!
//! The window is the inclusive range `[reference, reference + 7 days]`
//! projected onto month-day strings (`MM-DD`). Stored birthdays are compared
//! by their `MM-DD` slice, ignoring the year.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days added to the reference date to get the window end.
pub const BIRTHDAY_WINDOW_DAYS: u64 = 7;

/// How a window that runs past December 31 is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthdayWindowMode {
    /// Plain `start <= MM-DD <= end` string comparison.
    ///
    /// A window that wraps into January has `end < start` and matches nothing.
    #[default]
    MonthDay,
    /// Wrapping windows match `MM-DD >= start OR MM-DD <= end`.
    Calendar,
}

/// Month-day bounds of one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayWindow {
    pub start: String,
    pub end: String,
}

impl BirthdayWindow {
    /// Computes the window starting at `reference`.
    pub fn starting_at(reference: NaiveDate) -> Self {
        let end = reference
            .checked_add_days(Days::new(BIRTHDAY_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start: month_day(reference),
            end: month_day(end),
        }
    }

    /// Whether the window crosses the year boundary.
    pub fn wraps(&self) -> bool {
        self.end < self.start
    }

    /// Builds the SQL predicate over `column`, binding `start` then `end`.
    pub fn predicate(&self, column: &str, mode: BirthdayWindowMode) -> String {
        let md = format!("substr({column}, 6, 5)");
        match mode {
            BirthdayWindowMode::Calendar if self.wraps() => format!("({md} >= ? OR {md} <= ?)"),
            _ => format!("({md} >= ? AND {md} <= ?)"),
        }
    }
}

fn month_day(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::{BirthdayWindow, BirthdayWindowMode};
    use chrono::NaiveDate;
    use rusqlite::{params, Connection};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Evaluates the generated predicate in SQLite for one birthday.
    fn matches(window: &BirthdayWindow, birthday: &str, mode: BirthdayWindowMode) -> bool {
        let conn = Connection::open_in_memory().unwrap();
        let sql = format!(
            "SELECT {} FROM (SELECT ? AS birthday)",
            window.predicate("birthday", mode)
        );
        conn.query_row(&sql, params![window.start, window.end, birthday], |row| {
            row.get::<_, bool>(0)
        })
        .unwrap()
    }

    #[test]
    fn window_spans_seven_days_inclusive() {
        let window = BirthdayWindow::starting_at(date(2024, 6, 1));
        assert_eq!(window.start, "06-01");
        assert_eq!(window.end, "06-08");
        assert!(matches(&window, "1990-06-01", BirthdayWindowMode::MonthDay));
        assert!(matches(&window, "1990-06-08", BirthdayWindowMode::MonthDay));
        assert!(!matches(&window, "1990-06-09", BirthdayWindowMode::MonthDay));
        assert!(!matches(&window, "1990-05-31", BirthdayWindowMode::MonthDay));
    }

    #[test]
    fn year_end_window_matches_nothing_in_month_day_mode() {
        let window = BirthdayWindow::starting_at(date(2024, 12, 28));
        assert!(window.wraps());
        assert!(!matches(&window, "1985-01-02", BirthdayWindowMode::MonthDay));
        assert!(!matches(&window, "1985-12-30", BirthdayWindowMode::MonthDay));
    }

    #[test]
    fn year_end_window_wraps_in_calendar_mode() {
        let window = BirthdayWindow::starting_at(date(2024, 12, 28));
        assert_eq!(window.end, "01-04");
        assert!(matches(&window, "1985-01-02", BirthdayWindowMode::Calendar));
        assert!(matches(&window, "1985-12-30", BirthdayWindowMode::Calendar));
        assert!(!matches(&window, "1985-01-05", BirthdayWindowMode::Calendar));
        assert!(!matches(&window, "1985-12-27", BirthdayWindowMode::Calendar));
    }

    #[test]
    fn leap_day_reference_rolls_into_march() {
        let window = BirthdayWindow::starting_at(date(2024, 2, 29));
        assert_eq!(window.end, "03-07");
        assert!(matches(&window, "1990-03-01", BirthdayWindowMode::MonthDay));
        assert!(!matches(&window, "1990-03-08", BirthdayWindowMode::MonthDay));
    }

    #[test]
    fn calendar_mode_without_wrap_is_a_plain_range() {
        let window = BirthdayWindow::starting_at(date(2024, 6, 1));
        assert!(matches(&window, "1990-06-05", BirthdayWindowMode::Calendar));
        assert!(!matches(&window, "1990-12-30", BirthdayWindowMode::Calendar));
        assert!(!matches(&window, "1990-01-02", BirthdayWindowMode::Calendar));
    }
}
