use crate::designator::normalize_designator;

const USC_PREFIX: &str = "/us/usc/";

/// Structural components of a USLM identifier such as `/us/usc/t42/ch21/s1983`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UscIdentifier {
    pub title: Option<String>,
    pub chapter: Option<String>,
    pub section: Option<String>,
}

/// Splits a path segment into its lowercase type tag and the designator that
/// follows: `ch21` -> `("ch", "21")`, `schII` -> `("sch", "II")`.
fn split_segment(segment: &str) -> (&str, &str) {
    let boundary = segment
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(segment.len());
    segment.split_at(boundary)
}

pub fn clean_designator(value: &str) -> String {
    let dashed = value.replace(['\u{2013}', '\u{2014}'], "-");
    normalize_designator(dashed.trim())
}

impl UscIdentifier {
    pub fn parse(identifier: &str) -> Self {
        let path = identifier.trim();
        let path = path.strip_prefix(USC_PREFIX).unwrap_or(path);

        let mut parsed = Self::default();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let (tag, value) = split_segment(segment);
            if value.is_empty() {
                continue;
            }
            let slot = match tag {
                "t" => &mut parsed.title,
                "ch" => &mut parsed.chapter,
                "s" => &mut parsed.section,
                // Subtitle, subchapter, part, subpart, division, subdivision.
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(clean_designator(value));
            }
        }
        parsed
    }

    /// `"{title}-{chapter}"`, the chapter key shared by every section under it.
    pub fn chapter_id(&self) -> Option<String> {
        match (&self.title, &self.chapter) {
            (Some(title), Some(chapter)) => Some(format!("{title}-{chapter}")),
            (None, Some(chapter)) => Some(chapter.clone()),
            _ => None,
        }
    }
}
