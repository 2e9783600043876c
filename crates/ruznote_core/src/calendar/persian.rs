//! Gregorian-to-Persian calendar conversion.
//!
//! # Responsibility
//! - Convert a Gregorian instant into Persian year/month/day plus localized
//!   month and weekday names.
//! - Render the full display string used by note projections.
//!
//! # Invariants
//! - The conversion reproduces the historical algorithm exactly, including
//!   the rebased-year leap test, the fixed `-76` calibration offset, and the
//!   `> 366` cycle normalization. Display strings derived from stored
//!   timestamps must never change across releases.
//! - Gregorian fields are extracted in UTC.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

/// Cumulative day counts at the start of each Gregorian month.
const GREGORIAN_MONTH_DAYS: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Persian month names, indexed by `month - 1`.
const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Days of one 4-year Persian leap cycle.
const CYCLE_DAYS: i32 = 1461;

/// Zero-indexed day count covered by the six 31-day months.
const FIRST_HALF_DAYS: i32 = 186;

/// One Gregorian instant expressed in the Persian calendar.
///
/// `hour`/`minute`/`second` are carried through from the source instant
/// unchanged. `day` can legitimately be `0` on the eve of Nowruz in most
/// years; that value is produced by the historical algorithm and is kept for
/// compatibility with previously derived display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersianDate {
    pub year: i32,
    /// Persian month, always in `1..=12`.
    pub month: u32,
    /// Persian day of month; `1..=31` for months 1-6, `0..=30` for the rest.
    pub day: i32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Localized weekday name; the week conceptually starts on Saturday.
    pub weekday_name: &'static str,
    /// Localized month name matching `month`.
    pub month_name: &'static str,
}

impl PersianDate {
    /// Converts an epoch-millisecond timestamp into Persian calendar fields.
    ///
    /// Pure and total: timestamps outside chrono's representable range fall
    /// back to the Unix epoch rather than failing. Instants before the
    /// Persian epoch are outside the supported domain and yield unspecified
    /// field values.
    pub fn from_timestamp_millis(timestamp_millis: i64) -> Self {
        let instant: DateTime<Utc> =
            DateTime::from_timestamp_millis(timestamp_millis).unwrap_or_default();

        let mut gy = instant.year();
        let gm = instant.month() as i32;
        let gd = instant.day() as i32;

        // Rebase the epoch. The later leap test intentionally runs against
        // the rebased year; see the compatibility note in DESIGN.md.
        let mut jy: i32;
        if gy > 1600 {
            jy = 979;
            gy -= 1600;
        } else {
            jy = 0;
            gy -= 621;
        }

        let mut day_no = 365 * gy + (gy + 3) / 4 - (gy + 99) / 100 + (gy + 399) / 400;
        day_no += GREGORIAN_MONTH_DAYS[(gm - 1) as usize] + gd;

        if gm > 2 && (gy % 4 == 0 && gy % 100 != 0 || gy % 400 == 0) {
            day_no += 1;
        }

        // Fixed calibration offset aligning the two calendars.
        day_no -= 76;

        jy += 4 * (day_no / CYCLE_DAYS);
        day_no %= CYCLE_DAYS;

        if day_no > 366 {
            jy += (day_no - 1) / 365;
            day_no = (day_no - 1) % 365;
        }

        let days_zero_indexed = day_no - 1;
        let (month, day) = if days_zero_indexed < FIRST_HALF_DAYS {
            (1 + days_zero_indexed / 31, 1 + days_zero_indexed % 31)
        } else {
            let rest = days_zero_indexed - FIRST_HALF_DAYS;
            (7 + rest / 30, 1 + rest % 30)
        };
        let month = month as u32;

        Self {
            year: jy,
            month,
            day,
            hour: instant.hour(),
            minute: instant.minute(),
            second: instant.second(),
            weekday_name: weekday_name(instant.weekday()),
            month_name: MONTH_NAMES[(month - 1) as usize],
        }
    }

    /// Renders the full date string shown next to notes.
    ///
    /// Format: `"<weekday>، <day> <month> <year> - <HH>:<MM>"`.
    pub fn full_display(&self) -> String {
        format!(
            "{}، {} {} {} - {:02}:{:02}",
            self.weekday_name, self.day, self.month_name, self.year, self.hour, self.minute
        )
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sat => "شنبه",
        Weekday::Sun => "یکشنبه",
        Weekday::Mon => "دوشنبه",
        Weekday::Tue => "سه‌شنبه",
        Weekday::Wed => "چهارشنبه",
        Weekday::Thu => "پنج‌شنبه",
        Weekday::Fri => "جمعه",
    }
}

#[cfg(test)]
mod tests {
    use super::PersianDate;

    // 2024-03-20T12:30:05Z, the 1403 Persian new year.
    const NOWRUZ_1403: i64 = 1_710_937_805_000;

    #[test]
    fn nowruz_maps_to_first_of_farvardin() {
        let date = PersianDate::from_timestamp_millis(NOWRUZ_1403);
        assert_eq!(date.year, 1403);
        assert_eq!(date.month, 1);
        assert_eq!(date.day, 1);
        assert_eq!(date.month_name, "فروردین");
        assert_eq!(date.weekday_name, "چهارشنبه");
        assert_eq!((date.hour, date.minute, date.second), (12, 30, 5));
    }

    #[test]
    fn time_fields_carry_through_unchanged() {
        // 2025-09-01T08:04:00Z.
        let date = PersianDate::from_timestamp_millis(1_756_713_840_000);
        assert_eq!((date.year, date.month, date.day), (1404, 6, 10));
        assert_eq!((date.hour, date.minute, date.second), (8, 4, 0));
        assert_eq!(date.month_name, "شهریور");
        assert_eq!(date.weekday_name, "دوشنبه");
    }

    #[test]
    fn full_display_is_zero_padded_and_idempotent() {
        let date = PersianDate::from_timestamp_millis(1_756_713_840_000);
        let rendered = date.full_display();
        assert_eq!(rendered, "دوشنبه، 10 شهریور 1404 - 08:04");
        assert_eq!(rendered, date.full_display());
    }

    #[test]
    fn pre_epoch_of_chrono_range_falls_back_to_unix_epoch() {
        let clamped = PersianDate::from_timestamp_millis(i64::MAX);
        let epoch = PersianDate::from_timestamp_millis(0);
        assert_eq!(clamped, epoch);
    }
}
