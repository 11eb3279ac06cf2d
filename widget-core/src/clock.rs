//! Wall-clock access and locale-aware date/time formatting.

use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};
use std::fmt::Debug;

use crate::i18n::Locale;

/// Source of the current time, swappable in tests.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const MONTHS_AR: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر", "أكتوبر",
    "نوفمبر", "ديسمبر",
];

/// Long header date, e.g. `October 18th 2026, 3:04:05 pm`.
pub fn format_datetime(at: &DateTime<FixedOffset>, locale: Locale) -> String {
    let (is_pm, hour) = at.hour12();
    let month = at.month0() as usize;
    let day = at.day();

    match locale {
        Locale::En => format!(
            "{} {}{} {}, {}:{:02}:{:02} {}",
            MONTHS_EN[month],
            day,
            ordinal_suffix(day),
            at.year(),
            hour,
            at.minute(),
            at.second(),
            if is_pm { "pm" } else { "am" },
        ),
        Locale::Ar => arabic_numerals(&format!(
            "{} {} {}, {}:{:02}:{:02} {}",
            MONTHS_AR[month],
            day,
            at.year(),
            hour,
            at.minute(),
            at.second(),
            arabic_meridiem(is_pm),
        )),
    }
}

/// Short clock time of a Unix timestamp in the given offset, e.g. `6:13 AM`.
pub fn format_clock(unix_secs: i64, offset: FixedOffset, locale: Locale) -> Option<String> {
    let at = DateTime::from_timestamp(unix_secs, 0)?.with_timezone(&offset);
    let (is_pm, hour) = at.hour12();

    let text = match locale {
        Locale::En => format!(
            "{}:{:02} {}",
            hour,
            at.minute(),
            if is_pm { "PM" } else { "AM" }
        ),
        Locale::Ar => {
            arabic_numerals(&format!("{}:{:02} {}", hour, at.minute(), arabic_meridiem(is_pm)))
        }
    };
    Some(text)
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn arabic_meridiem(is_pm: bool) -> &'static str {
    if is_pm { "م" } else { "ص" }
}

/// ASCII digits to Arabic-Indic digits, comma to the Arabic comma.
fn arabic_numerals(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32('\u{0660}' as u32 + (c as u32 - '0' as u32)).unwrap_or(c),
            ',' => '،',
            other => other,
        })
        .collect()
}
