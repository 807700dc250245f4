use crate::types::{Section, SourceDocument, SourceKind};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod cgs;
pub mod common;
pub mod configs;
pub mod usc;

/// Chapter metadata observed by a front end. A chapter only enters the corpus
/// once a section claims it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterInfo {
    pub chapter_id: String,
    pub chapter_number: String,
    pub chapter_title: Option<String>,
}

/// Title metadata observed by a front end (title pages, USLM `<meta>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleInfo {
    pub title_id: String,
    pub title_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractWarning {
    UnparseableLabel { section_id: String, label: String },
    MissingTitle { section_id: String },
    MalformedDocument { path: String, message: String },
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnparseableLabel { section_id, label } => {
                write!(f, "unparseable label for {section_id}: {label:?}")
            }
            Self::MissingTitle { section_id } => {
                write!(f, "no title membership for {section_id}")
            }
            Self::MalformedDocument { path, message } => {
                write!(f, "malformed document {path}: {message}")
            }
        }
    }
}

/// Everything one document contributed. Extraction never fails; problems are
/// reported through `warnings` and the affected fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentExtract {
    pub sections: Vec<Section>,
    pub chapters: Vec<ChapterInfo>,
    pub titles: Vec<TitleInfo>,
    pub warnings: Vec<ExtractWarning>,
}

impl DocumentExtract {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.chapters.is_empty() && self.titles.is_empty()
    }
}

/// One markup front end. Both converge on the shared `Section` shape.
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Whether a mirrored file belongs to this source.
    fn accepts(&self, path: &str) -> bool;

    fn extract(&self, document: &SourceDocument) -> DocumentExtract;
}

pub fn adapter_for(source: SourceKind) -> &'static (dyn SourceAdapter + Send + Sync) {
    match source {
        SourceKind::Usc => &usc::adapter::USC_ADAPTER,
        SourceKind::Cgs => &cgs::adapter::CGS_ADAPTER,
    }
}
