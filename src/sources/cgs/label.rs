use crate::types::clean_section_id;
use regex::Regex;
use std::sync::LazyLock;

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Secs?)\.\s+([^.]+)\.\s*(.*)$").unwrap());
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s+to\s+([^,]+)").unwrap());

/// Structured fields recovered from a catch-line such as `"Sec. 12-100. Definitions."`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLabel {
    pub number: Option<String>,
    pub title: Option<String>,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
}

impl ParsedLabel {
    pub fn is_range(&self) -> bool {
        self.range_start.is_some() && self.range_start != self.range_end
    }
}

/// Parses `"Sec" | "Secs" "." <designator-list> "." <title>`.
///
/// A plural label with a `<first> to <last>` list yields a range; any other
/// parsed label has `range_start == range_end == number`. Text that does not
/// match the grammar yields an empty [`ParsedLabel`].
pub fn parse_label(label: &str) -> ParsedLabel {
    let Some(captures) = LABEL_RE.captures(label.trim()) else {
        return ParsedLabel::default();
    };

    let is_multiple = captures[1].eq_ignore_ascii_case("secs");
    let number = captures[2].trim().to_string();
    let title = Some(captures[3].trim().to_string()).filter(|value| !value.is_empty());

    if is_multiple {
        if let Some(range) = RANGE_RE.captures(&number) {
            return ParsedLabel {
                range_start: Some(range[1].trim().to_string()),
                range_end: Some(range[2].trim().to_string()),
                number: Some(number),
                title,
            };
        }
    }

    ParsedLabel {
        range_start: Some(number.clone()),
        range_end: Some(number.clone()),
        number: Some(number),
        title,
    }
}

/// Title membership: the designator's prefix before its first hyphen
/// (`"12-100"` -> `"12"`); without a hyphen, the hyphen prefix of the cleaned
/// section id; failing both, the designator itself.
pub fn extract_title_id(
    section_id: &str,
    section_number: Option<&str>,
    range_start: Option<&str>,
) -> Option<String> {
    let candidate = range_start.or(section_number)?.trim();
    if candidate.is_empty() {
        return None;
    }

    if let Some((prefix, _)) = candidate.split_once('-') {
        return Some(prefix.trim().to_string());
    }

    let cleaned = clean_section_id(section_id);
    if let Some((prefix, _)) = cleaned.split_once('-') {
        return Some(prefix.trim().to_string());
    }

    Some(candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_label_sets_both_range_ends() {
        let parsed = parse_label("Sec. 4-7. Terms.");
        assert_eq!(parsed.range_start.as_deref(), Some("4-7"));
        assert!(!parsed.is_range());
    }

    #[test]
    fn range_list_stops_at_first_comma() {
        let parsed = parse_label("Secs. 2-1 to 2-3, inclusive. Repealed.");
        assert_eq!(parsed.range_end.as_deref(), Some("2-3"));
    }
}
