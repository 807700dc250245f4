use crate::sources::cgs::extractor::extract_fragment;
use crate::sources::cgs::label::{extract_title_id, parse_label};
use crate::sources::ExtractWarning;
use crate::text::{strip_tags, trim_trailing_headings};
use crate::types::Section;
use regex::Regex;
use std::sync::LazyLock;

static SPAN_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<span\b[^>]*>").unwrap());
static CLASS_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bclass\s*=\s*"([^"]*)""#).unwrap());
static ID_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bid\s*=\s*"([^"]+)""#).unwrap());
static PAGE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").unwrap());
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name="Description"[^>]+content="([^"]+)""#).unwrap()
});
static CHAPTER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(Article|Chapter)\s+[^-]+-\s+").unwrap());
static TITLE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Title\s+\w+?\s*-\s*(.+)$").unwrap());

/// One section candidate: the markup from its catch-line anchor up to the next anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFragment<'a> {
    pub section_id: &'a str,
    pub start: usize,
    pub end: usize,
    pub markup: &'a str,
}

/// Locates every catch-line anchor in document order and slices the document
/// between consecutive anchors. The last fragment runs to the end of the document.
pub fn split_sections(html: &str) -> Vec<RawFragment<'_>> {
    let anchors = SPAN_OPEN_RE
        .find_iter(html)
        .filter_map(|span| {
            let tag = span.as_str();
            let classes = CLASS_ATTR_RE.captures(tag)?;
            if !classes[1].split_whitespace().any(|class| class == "catchln") {
                return None;
            }
            let id = ID_ATTR_RE.captures(tag)?.get(1)?;
            let id_start = span.start() + id.start();
            Some((span.start(), &html[id_start..id_start + id.len()]))
        })
        .collect::<Vec<_>>();

    anchors
        .iter()
        .enumerate()
        .map(|(index, (start, section_id))| {
            let end = anchors
                .get(index + 1)
                .map_or(html.len(), |(next_start, _)| *next_start);
            RawFragment {
                section_id,
                start: *start,
                end,
                markup: &html[*start..end],
            }
        })
        .collect()
}

/// Builds the section record for one fragment. Identity fields stay empty when
/// the catch-line does not match the label grammar.
pub fn parse_fragment(
    fragment: &RawFragment<'_>,
    chapter_id: &str,
    source_file: &str,
    warnings: &mut Vec<ExtractWarning>,
) -> Section {
    let extracted = extract_fragment(fragment.markup);
    let label = extracted
        .label
        .unwrap_or_else(|| fragment.section_id.to_string());
    let parsed = parse_label(&label);

    if parsed.number.is_none() {
        warnings.push(ExtractWarning::UnparseableLabel {
            section_id: fragment.section_id.to_string(),
            label: label.clone(),
        });
    }

    let title_id = extract_title_id(
        fragment.section_id,
        parsed.number.as_deref(),
        parsed.range_start.as_deref(),
    );
    if title_id.is_none() {
        warnings.push(ExtractWarning::MissingTitle {
            section_id: fragment.section_id.to_string(),
        });
    }

    let mut blocks = extracted.blocks;
    blocks.body = trim_trailing_headings(&blocks.body);

    let mut section = Section::new(fragment.section_id, label);
    section.title_id = title_id;
    section.chapter_id = Some(chapter_id.to_string()).filter(|id| !id.is_empty());
    section.section_number = parsed.number;
    section.section_title = parsed.title;
    section.range_start = parsed.range_start;
    section.range_end = parsed.range_end;
    section.blocks = blocks;
    section.source_file = source_file.to_string();
    section
}

fn page_title(html: &str) -> Option<String> {
    let captures = PAGE_TITLE_RE.captures(html)?;
    Some(strip_tags(&captures[1])).filter(|title| !title.is_empty())
}

/// Chapter heading from the page `<title>`, falling back to the Description
/// meta tag, with any leading `"Chapter 1 - "` prefix removed.
pub fn extract_chapter_title(html: &str) -> Option<String> {
    let title = page_title(html).or_else(|| {
        let captures = DESCRIPTION_RE.captures(html)?;
        Some(strip_tags(&captures[1])).filter(|title| !title.is_empty())
    })?;
    Some(clean_chapter_title(&title))
}

pub fn clean_chapter_title(title: &str) -> String {
    CHAPTER_PREFIX_RE.replace(title, "").trim().to_string()
}

/// Title name from a title page whose `<title>` reads `"Title 1 - General Provisions"`.
pub fn extract_title_name(html: &str) -> Option<String> {
    let title = page_title(html)?;
    let captures = TITLE_NAME_RE.captures(&title)?;
    Some(captures[1].trim().to_string()).filter(|name| !name.is_empty())
}

/// Chapter designator from a page stem: `chap_001` -> `001`, `art_002a` -> `002a`.
pub fn chapter_number_from_stem(stem: &str) -> &str {
    stem.strip_prefix("chap_")
        .or_else(|| stem.strip_prefix("art_"))
        .unwrap_or(stem)
}

/// Title designator from a title page stem: `title_47a` -> `47a`.
pub fn title_id_from_stem(stem: &str) -> Option<&str> {
    let lower_prefix = stem.get(..6)?;
    if !lower_prefix.eq_ignore_ascii_case("title_") {
        return None;
    }
    Some(&stem[6..]).filter(|id| !id.is_empty())
}
