//! Daily quote rotation and the celebration countdown.
//!
//! Both are pure over [`NaiveDate`]; callers supply "today" so the library
//! never reads the clock.

use chrono::{Datelike, NaiveDate};

/// Rotation anchor. The quote index is the number of whole days since this
/// date, modulo the list length.
fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid reference date")
}

pub const DAILY_QUOTES: [&str; 12] = [
    "Every day closer is a day worth celebrating.",
    "Save the date, but spend the waiting well.",
    "Joy shared is joy doubled; write it down and pass it on.",
    "The best parties start long before the first guest arrives.",
    "Count the days, then make the days count.",
    "A little anticipation is the secret ingredient of every celebration.",
    "Good news travels fastest between friends.",
    "Light the candles early; practice makes perfect.",
    "Some dates are appointments; this one is a promise.",
    "Confetti is just paperwork that learned to have fun.",
    "Mark the calendar in ink, not pencil.",
    "The countdown is half the gift.",
];

/// The quote for a given day. Dates before the reference still rotate
/// through the full list rather than going out of range.
pub fn daily_quote(today: NaiveDate) -> &'static str {
    let days = (today - reference_date()).num_days();
    let len = DAILY_QUOTES.len() as i64;
    DAILY_QUOTES[days.rem_euclid(len) as usize]
}

/// The next July 12 on or after `today`.
pub fn celebration_date(today: NaiveDate) -> NaiveDate {
    let this_year =
        NaiveDate::from_ymd_opt(today.year(), 7, 12).expect("July 12 exists in every year");
    if this_year >= today {
        this_year
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, 7, 12).expect("July 12 exists in every year")
    }
}

/// Whole days from `today` until the next celebration; zero on the day.
pub fn days_until_celebration(today: NaiveDate) -> i64 {
    (celebration_date(today) - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quote_is_deterministic_per_day() {
        let today = date(2026, 8, 7);
        assert_eq!(daily_quote(today), daily_quote(today));
    }

    #[test]
    fn quote_rotates_daily_and_cycles() {
        let start = date(2025, 1, 1);
        assert_eq!(daily_quote(start), DAILY_QUOTES[0]);
        assert_eq!(daily_quote(date(2025, 1, 2)), DAILY_QUOTES[1]);

        // One full cycle later it wraps around.
        let wrapped = start + chrono::Duration::days(DAILY_QUOTES.len() as i64);
        assert_eq!(daily_quote(wrapped), DAILY_QUOTES[0]);
    }

    #[test]
    fn quote_handles_dates_before_the_reference() {
        assert_eq!(daily_quote(date(2024, 12, 31)), DAILY_QUOTES[11]);
    }

    #[test]
    fn countdown_targets_the_next_july_12() {
        assert_eq!(celebration_date(date(2026, 7, 1)), date(2026, 7, 12));
        assert_eq!(celebration_date(date(2026, 7, 12)), date(2026, 7, 12));
        assert_eq!(celebration_date(date(2026, 7, 13)), date(2027, 7, 12));

        assert_eq!(days_until_celebration(date(2026, 7, 12)), 0);
        assert_eq!(days_until_celebration(date(2026, 7, 2)), 10);
    }
}
