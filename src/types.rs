use crate::designator::{format_designator_display, format_designator_padded, normalize_designator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Cgs,
    Usc,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cgs => "cgs",
            Self::Usc => "usc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cgs" => Some(Self::Cgs),
            "usc" => Some(Self::Usc),
            _ => None,
        }
    }
}

/// One already-fetched markup document, tagged with its path relative to the mirror root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: String,
    pub markup: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            markup: markup.into(),
        }
    }

    /// File name without directories or extension (`"pub/chap_001.htm"` -> `"chap_001"`).
    pub fn file_stem(&self) -> &str {
        let name = self.path.rsplit(['/', '\\']).next().unwrap_or(&self.path);
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Body,
    HistoryShort,
    HistoryLong,
    Citations,
    SeeAlso,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::HistoryShort => "history_short",
            Self::HistoryLong => "history_long",
            Self::Citations => "citations",
            Self::SeeAlso => "see_also",
        }
    }
}

/// The five independently extracted text blocks of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlocks {
    pub body: String,
    pub history_short: String,
    pub history_long: String,
    pub citations: String,
    pub see_also: String,
}

impl TextBlocks {
    pub fn get_mut(&mut self, kind: BlockKind) -> &mut String {
        match kind {
            BlockKind::Body => &mut self.body,
            BlockKind::HistoryShort => &mut self.history_short,
            BlockKind::HistoryLong => &mut self.history_long,
            BlockKind::Citations => &mut self.citations,
            BlockKind::SeeAlso => &mut self.see_also,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_id: String,
    pub title_id: Option<String>,
    pub chapter_id: Option<String>,
    pub section_number: Option<String>,
    pub section_title: Option<String>,
    pub section_label: String,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
    #[serde(flatten)]
    pub blocks: TextBlocks,
    pub prev_section_id: Option<String>,
    pub next_section_id: Option<String>,
    pub prev_section_label: Option<String>,
    pub next_section_label: Option<String>,
    pub source_file: String,
}

impl Section {
    pub fn new(section_id: impl Into<String>, section_label: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            title_id: None,
            chapter_id: None,
            section_number: None,
            section_title: None,
            section_label: section_label.into(),
            range_start: None,
            range_end: None,
            blocks: TextBlocks::default(),
            prev_section_id: None,
            next_section_id: None,
            prev_section_label: None,
            next_section_label: None,
            source_file: String::new(),
        }
    }

    /// Designator used for ordering: range start, else the number, else the cleaned raw id.
    pub fn ordering_designator(&self) -> String {
        self.range_start
            .as_deref()
            .or(self.section_number.as_deref())
            .map(ToString::to_string)
            .unwrap_or_else(|| clean_section_id(&self.section_id).to_string())
    }
}

/// Strips the source-specific id prefixes (`secs_`, `sec_`, USLM path prefix).
pub fn clean_section_id(section_id: &str) -> &str {
    section_id
        .strip_prefix("secs_")
        .or_else(|| section_id.strip_prefix("sec_"))
        .or_else(|| section_id.strip_prefix("/us/usc/"))
        .unwrap_or(section_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_id: String,
    pub chapter_number: String,
    pub chapter_title: Option<String>,
    pub title_id: Option<String>,
    pub title_id_padded: Option<String>,
    pub title_id_display: Option<String>,
    pub chapter_id_padded: String,
    pub chapter_id_display: String,
    pub section_count: usize,
    pub section_start: Option<String>,
    pub section_end: Option<String>,
}

impl Chapter {
    pub fn new(chapter_id: impl Into<String>, chapter_number: impl Into<String>) -> Self {
        let chapter_number = chapter_number.into();
        Self {
            chapter_id: chapter_id.into(),
            chapter_id_padded: format_designator_padded(&chapter_number),
            chapter_id_display: format_designator_display(&chapter_number),
            chapter_number,
            chapter_title: None,
            title_id: None,
            title_id_padded: None,
            title_id_display: None,
            section_count: 0,
            section_start: None,
            section_end: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub title_id: String,
    pub title_id_padded: String,
    pub title_id_display: String,
    pub title_name: Option<String>,
    pub chapter_count: usize,
    pub section_count: usize,
}

impl Title {
    pub fn new(title_id: &str) -> Self {
        Self {
            title_id: normalize_designator(title_id),
            title_id_padded: format_designator_padded(title_id),
            title_id_display: format_designator_display(title_id),
            title_name: None,
            chapter_count: 0,
            section_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub content: String,
}

/// Per-section document content object handed to the content collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub version: u32,
    pub doc_id: String,
    pub doc_type: String,
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub identifier: String,
    pub display: String,
    pub heading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level_type", rename_all = "snake_case")]
pub enum LevelIndex {
    Title {
        version: u32,
        title_id: String,
        title_display: String,
        title_name: Option<String>,
        chapters: Vec<ChapterEntry>,
    },
    Chapter {
        version: u32,
        title_id: Option<String>,
        title_display: Option<String>,
        chapter_id: String,
        chapter_display: String,
        chapter_name: Option<String>,
        section_count: usize,
        section_start: Option<String>,
        section_end: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestConfig {
    pub source: SourceKind,
    pub mirror_root: String,
    pub callback_base: String,
    pub callback_token: String,
    #[serde(default)]
    pub run_id: Option<String>,
}
