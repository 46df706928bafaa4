//! Time and date parsing for timeline extraction.
//!
//! Everything here is best-effort: a string that cannot be parsed yields
//! `None`, never an error.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

/// Clock times with a meridiem: `8:12 PM`, `8:12:00 pm`, `11:05AM`
pub static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}:\d{2}(?::\d{2})?\s*(?:AM|PM))").expect("valid clock regex")
});

static CLOCK_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2}):(\d{2})(?::(\d{2}))?\s*(AM|PM)?$").expect("valid clock regex")
});

static BARE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid time regex"));

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("valid year regex"));

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("valid ordinal regex")
});

/// Date layouts tried in order; month-first for ambiguous numeric dates
const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
];

/// Image timestamp layouts (ISO and EXIF)
const TIMESTAMP_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Source of "now" for the processing-time fallbacks.
///
/// `System` makes those fallbacks non-deterministic; tests pin them with
/// `Fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingClock {
    #[default]
    System,
    Fixed(NaiveDateTime),
}

impl ProcessingClock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            ProcessingClock::System => Utc::now().naive_utc(),
            ProcessingClock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Parse `H:MM[:SS] [AM|PM]` into a time of day
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let caps = CLOCK_PARTS.captures(raw.trim())?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    let second: u32 = match caps.get(3) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };

    if let Some(meridiem) = caps.get(4) {
        if hour == 0 || hour > 12 {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (pm, hour) {
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, 12) => 0,
            (false, h) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Parse a bare 24-hour `H:MM` mention
pub fn parse_bare_time(raw: &str) -> Option<NaiveTime> {
    let caps = BARE_TIME.captures(raw.trim())?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse a raw date substring using the common layouts
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = normalize_date_text(raw);
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(&cleaned, layout).ok())
}

fn normalize_date_text(raw: &str) -> String {
    // "5th" -> "5"
    let stripped = ORDINAL.replace_all(raw.trim(), "$1");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Four-digit year mentioned in a string
pub fn extract_year(raw: &str) -> Option<i32> {
    YEAR.captures(raw)?.get(1)?.as_str().parse().ok()
}

/// Date to anchor a record's clock times on.
///
/// Uses the first extracted date if it parses; otherwise today's date with
/// the year replaced by any four-digit year in that string; otherwise today.
pub fn resolve_base_date(dates: &[String], clock: &ProcessingClock) -> NaiveDate {
    let today = clock.today();
    let Some(first) = dates.first() else {
        return today;
    };

    if let Some(date) = parse_date(first) {
        return date;
    }

    extract_year(first)
        .and_then(|year| {
            today
                .with_year(year)
                // Feb 29 in a non-leap year
                .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
        })
        .unwrap_or(today)
}

/// Parse an image timestamp (ISO-8601, EXIF, or RFC 3339)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}
