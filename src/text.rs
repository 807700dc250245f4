use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap());
static STRUCTURAL_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:PART|SUBPART|ARTICLE|CHAPTER)\s+[IVXLC\d]+$|^\(([A-Z]|[IVXLC]+)\)$").unwrap()
});
static UPPERCASE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s\-,&]+$").unwrap());

const MAX_UPPERCASE_HEADING_LEN: usize = 80;

/// Collapses every whitespace run to one space and trims the ends.
pub fn collapse_text(value: impl AsRef<str>) -> String {
    WHITESPACE_RE
        .replace_all(value.as_ref().trim(), " ")
        .trim()
        .to_string()
}

/// Normalizes an extracted block: whitespace runs within a line become one
/// space, consecutive blank lines collapse to one, and leading/trailing blank
/// lines are dropped. Idempotent.
pub fn normalize_block(raw: &str) -> String {
    let mut normalized: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if !previous_blank {
                normalized.push(String::new());
            }
            previous_blank = true;
        } else {
            normalized.push(line);
            previous_blank = false;
        }
    }

    normalized.join("\n").trim().to_string()
}

/// Paragraph form used for schema-tagged text: each non-empty line is
/// collapsed and paragraphs are separated by one blank line. Idempotent.
pub fn normalize_paragraphs(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Decodes named and numeric character references. Unknown names are left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    ENTITY_RE.replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        let decoded = if let Some(hex) = name
            .strip_prefix("#x")
            .or_else(|| name.strip_prefix("#X"))
        {
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
        } else if let Some(decimal) = name.strip_prefix('#') {
            decimal.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
        } else {
            resolve_html5_entity(name).map(ToString::to_string)
        };
        decoded.unwrap_or_else(|| caps[0].to_string())
    })
}

/// Strips inline tags from a short markup snippet and decodes entities.
pub fn strip_tags(markup: &str) -> String {
    static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
    collapse_text(decode_entities(&TAG_RE.replace_all(markup, "")))
}

fn is_structural_heading(line: &str) -> bool {
    STRUCTURAL_HEADING_RE.is_match(line)
        || (UPPERCASE_HEADING_RE.is_match(line) && line.len() <= MAX_UPPERCASE_HEADING_LEN)
}

/// Repeatedly removes structural heading lines (`PART II`, all-caps captions,
/// `(A)`) from the end of a body. They belong to the next unit and leak in
/// through adjacency-based slicing.
pub fn trim_trailing_headings(body_text: &str) -> String {
    if body_text.is_empty() {
        return String::new();
    }

    let mut lines = body_text.lines().collect::<Vec<_>>();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    while let Some(last) = lines.last() {
        if !is_structural_heading(last.trim()) {
            break;
        }

        lines.pop();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_unknown_entities() {
        assert_eq!(decode_entities("A &bogus; B"), "A &bogus; B");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_entities("&#167; &#xA7;"), "§ §");
    }
}
