/// Date canonicalization: maps free text to a "YYYY-MM-DD HH:MM" string.
///
/// Strategy chain, first success wins:
/// 1. Strip connector phrases ("born on", "born", range "to"), then fuzzy
///    parse the remaining text, filling unspecified components from a default
///    of January 1 of the configured year.
/// 2. Recognize date expressions in the raw text, take the last one, retry
///    the fuzzy parse on that expression alone.
/// 3. Give up and return the input unchanged.
///
/// The default year is injected through Config rather than read from the
/// clock at parse time, so runs are reproducible and the year bias on
/// partially specified dates stays visible and tunable.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ner::EntityRecognizer;

static CONNECTORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(born on|born|\bto\b)").expect("Failed to compile connector pattern")
});

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{2}))?\b")
        .expect("Failed to compile ISO date pattern")
});

static SLASH_DATE: Lazy<Regex> = Lazy::new(|| {
    // Month-first, matching the reference parser's convention
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("Failed to compile slash date pattern")
});

const MONTH_NAMES: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_NAMES})\b\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b"
    ))
    .expect("Failed to compile month-day pattern")
});

static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTH_NAMES})\b"
    ))
    .expect("Failed to compile day-month pattern")
});

static MONTH_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({MONTH_NAMES})\b")).expect("Failed to compile month pattern")
});

static YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(1[0-9]{3}|20[0-9]{2})\b").expect("Failed to compile year pattern")
});

static TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2}):(\d{2})\b").expect("Failed to compile time pattern")
});

pub struct DateNormalizer<'a> {
    ner: &'a EntityRecognizer,
    default_year: i32,
}

impl<'a> DateNormalizer<'a> {
    pub fn new(ner: &'a EntityRecognizer, default_year: i32) -> Self {
        DateNormalizer { ner, default_year }
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.fuzzy(raw)
            .or_else(|| self.entity_fallback(raw))
            .unwrap_or_else(|| raw.to_string())
    }

    /// Strategy 1: fuzzy parse the connector-stripped text.
    fn fuzzy(&self, raw: &str) -> Option<String> {
        fuzzy_parse(&strip_connectors(raw), self.default_year)
    }

    /// Strategy 2: last date expression found by the recognizer.
    fn entity_fallback(&self, raw: &str) -> Option<String> {
        let entities = self.ner.date_entities(raw);
        let last = entities.last()?;
        fuzzy_parse(&strip_connectors(last), self.default_year)
    }
}

fn strip_connectors(raw: &str) -> String {
    CONNECTORS.replace_all(raw, "").trim().to_string()
}

/// Parse a date out of prose, tolerating surrounding words.
///
/// Any component not present in the text falls back to the default:
/// January 1 of `default_year`, midnight. Fails only when the text contains
/// no recognizable date component at all.
fn fuzzy_parse(text: &str, default_year: i32) -> Option<String> {
    let (hour, minute) = TIME
        .captures(text)
        .and_then(|c| {
            let h: u32 = c[1].parse().ok()?;
            let m: u32 = c[2].parse().ok()?;
            (h < 24 && m < 60).then_some((h, m))
        })
        .unwrap_or((0, 0));

    if let Some(c) = ISO_DATE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            c[1].parse().ok()?,
            c[2].parse().ok()?,
            c[3].parse().ok()?,
        )?;
        let (h, m) = match (c.get(4), c.get(5)) {
            (Some(h), Some(m)) => (h.as_str().parse().ok()?, m.as_str().parse().ok()?),
            _ => (hour, minute),
        };
        return render(date, h, m);
    }

    if let Some(c) = SLASH_DATE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            c[3].parse().ok()?,
            c[1].parse().ok()?,
            c[2].parse().ok()?,
        )?;
        return render(date, hour, minute);
    }

    let year: Option<i32> = YEAR.captures(text).and_then(|c| c[1].parse().ok());

    let (month, day) = if let Some(c) = MONTH_DAY.captures(text) {
        (Some(month_number(&c[1])?), Some(c[2].parse::<u32>().ok()?))
    } else if let Some(c) = DAY_MONTH.captures(text) {
        (Some(month_number(&c[2])?), Some(c[1].parse::<u32>().ok()?))
    } else if let Some(c) = MONTH_ONLY.captures(text) {
        (Some(month_number(&c[1])?), None)
    } else {
        (None, None)
    };

    // No date component at all: this string is not a date
    if month.is_none() && year.is_none() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        year.unwrap_or(default_year),
        month.unwrap_or(1),
        day.unwrap_or(1),
    )?;
    render(date, hour, minute)
}

fn render(date: NaiveDate, hour: u32, minute: u32) -> Option<String> {
    let dt: NaiveDateTime = date.and_hms_opt(hour, minute, 0)?;
    Some(dt.format("%Y-%m-%d %H:%M").to_string())
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_lowercase();
    let n = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}
