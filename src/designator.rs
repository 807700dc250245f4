//! Designator views and natural ordering.
//!
//! A designator is `<digits><optional letter suffix>` ("7a", "028A"). Every
//! view is a pure function of its input; values that are not designators pass
//! through with ASCII case folding only.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static DESIGNATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0*([0-9]+)([a-zA-Z]*)$").unwrap());
static RANGE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+to\s+").unwrap());

/// Zero-fill width for padded designators. The corpus caps at 4-digit numbers.
pub const DESIGNATOR_PAD_WIDTH: usize = 4;

fn split_designator(value: &str) -> Option<(&str, &str)> {
    let captures = DESIGNATOR_RE.captures(value.trim())?;
    let number = captures.get(1)?.as_str();
    let suffix = captures.get(2)?.as_str();
    Some((number, suffix))
}

/// Stable key form: leading zeros stripped, suffix lowercased.
pub fn normalize_designator(value: &str) -> String {
    match split_designator(value) {
        Some((number, suffix)) => format!("{number}{}", suffix.to_ascii_lowercase()),
        None => value.trim().to_ascii_lowercase(),
    }
}

/// Presentation form: leading zeros stripped, suffix uppercased.
pub fn format_designator_display(value: &str) -> String {
    match split_designator(value) {
        Some((number, suffix)) => format!("{number}{}", suffix.to_ascii_uppercase()),
        None => value.trim().to_ascii_uppercase(),
    }
}

/// Sort form: digits zero-filled to [`DESIGNATOR_PAD_WIDTH`], suffix lowercased.
pub fn format_designator_padded(value: &str) -> String {
    format_designator_padded_to(value, DESIGNATOR_PAD_WIDTH)
}

pub fn format_designator_padded_to(value: &str, width: usize) -> String {
    match split_designator(value) {
        Some((number, suffix)) => {
            format!("{number:0>width$}{}", suffix.to_ascii_lowercase())
        }
        None => value.trim().to_ascii_lowercase(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Digit run with leading zeros removed; compares by length, then digits.
    Number(String),
    Text(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Comparison key splitting a string into digit and non-digit runs, so
/// `"9" < "10"` and `"3" < "3a" < "10"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    pub fn new(value: &str) -> Self {
        let mut segments = Vec::new();
        let mut run = String::new();
        let mut run_is_digit = false;

        for ch in value.chars() {
            let is_digit = ch.is_ascii_digit();
            if !run.is_empty() && is_digit != run_is_digit {
                segments.push(Self::segment(&run, run_is_digit));
                run.clear();
            }
            run_is_digit = is_digit;
            run.push(ch);
        }
        if !run.is_empty() {
            segments.push(Self::segment(&run, run_is_digit));
        }

        Self(segments)
    }

    fn segment(run: &str, is_digit: bool) -> Segment {
        if is_digit {
            let trimmed = run.trim_start_matches('0');
            Segment::Number(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
        } else {
            Segment::Text(run.to_lowercase())
        }
    }
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

/// Splits a range-bearing designator on its `to` boundary into `(first, last)`,
/// ignoring anything after the first comma. A plain designator is returned as both ends.
pub fn split_range(value: &str) -> (&str, &str) {
    let value = value.split(',').next().unwrap_or(value);
    let parts = RANGE_SPLIT_RE.split(value).collect::<Vec<_>>();
    match parts.as_slice() {
        [first, .., last] => (first.trim(), last.trim()),
        _ => (value.trim(), value.trim()),
    }
}
