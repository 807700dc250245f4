//! Output documents: one content object per section plus title and chapter
//! index documents, each keyed by a deterministic slug.

use crate::corpus::Corpus;
use crate::sources::common::{body_block, push_block, slug_segment};
use crate::types::{
    BlockKind, Chapter, ChapterEntry, LevelIndex, Section, SectionContent, SourceKind, Title,
};

pub const CONTENT_VERSION: u32 = 2;
pub const DOC_TYPE: &str = "statute";

/// Designator used in slugs and doc ids: the section number, else the cleaned id.
fn section_designator(section: &Section) -> String {
    let designator = section
        .section_number
        .clone()
        .unwrap_or_else(|| crate::types::clean_section_id(&section.section_id).to_string());
    slug_segment(&designator)
}

/// `statutes/{source}/section/{title}/{designator}`; the title segment is
/// omitted when the section has no title membership.
pub fn section_slug(source: SourceKind, section: &Section) -> String {
    let designator = section_designator(section);
    match section.title_id.as_deref() {
        Some(title_id) => format!(
            "statutes/{}/section/{}/{designator}",
            source.as_str(),
            slug_segment(title_id)
        ),
        None => format!("statutes/{}/section/{designator}", source.as_str()),
    }
}

pub fn doc_id(source: SourceKind, section: &Section) -> String {
    let designator = section_designator(section);
    match (source, section.title_id.as_deref()) {
        (SourceKind::Usc, Some(title_id)) => format!("doc_usc_{title_id}-{designator}"),
        _ => format!("doc_{}_{designator}", source.as_str()),
    }
}

fn citations_label(source: SourceKind) -> &'static str {
    match source {
        SourceKind::Cgs => "Citations",
        SourceKind::Usc => "Notes",
    }
}

/// Ordered typed blocks for one section. `body` is always first; the other
/// blocks appear only when non-empty. `see_also` stays on the section record.
pub fn section_content(source: SourceKind, section: &Section) -> SectionContent {
    let blocks = &section.blocks;
    let mut content = vec![body_block(&blocks.body)];
    push_block(
        &mut content,
        BlockKind::HistoryShort,
        "History",
        &blocks.history_short,
    );
    push_block(
        &mut content,
        BlockKind::HistoryLong,
        "History Notes",
        &blocks.history_long,
    );
    push_block(
        &mut content,
        BlockKind::Citations,
        citations_label(source),
        &blocks.citations,
    );

    SectionContent {
        version: CONTENT_VERSION,
        doc_id: doc_id(source, section),
        doc_type: DOC_TYPE.to_string(),
        blocks: content,
    }
}

pub fn title_slug(source: SourceKind, title: &Title) -> String {
    format!("statutes/{}/title/{}", source.as_str(), title.title_id)
}

pub fn chapter_slug(source: SourceKind, chapter: &Chapter) -> String {
    match chapter.title_id.as_deref() {
        Some(title_id) => format!(
            "statutes/{}/chapter/{title_id}/{}",
            source.as_str(),
            slug_segment(&chapter.chapter_number)
        ),
        None => format!(
            "statutes/{}/chapter/{}",
            source.as_str(),
            slug_segment(&chapter.chapter_id)
        ),
    }
}

pub fn title_index(corpus: &Corpus, title: &Title) -> LevelIndex {
    let chapters = corpus
        .chapters_in_title(&title.title_id)
        .map(|chapter| ChapterEntry {
            identifier: chapter.chapter_id.clone(),
            display: chapter.chapter_id_display.clone(),
            heading: chapter.chapter_title.clone(),
        })
        .collect();

    LevelIndex::Title {
        version: CONTENT_VERSION,
        title_id: title.title_id.clone(),
        title_display: title.title_id_display.clone(),
        title_name: title.title_name.clone(),
        chapters,
    }
}

pub fn chapter_index(chapter: &Chapter) -> LevelIndex {
    LevelIndex::Chapter {
        version: CONTENT_VERSION,
        title_id: chapter.title_id.clone(),
        title_display: chapter.title_id_display.clone(),
        chapter_id: chapter.chapter_id.clone(),
        chapter_display: chapter.chapter_id_display.clone(),
        chapter_name: chapter.chapter_title.clone(),
        section_count: chapter.section_count,
        section_start: chapter.section_start.clone(),
        section_end: chapter.section_end.clone(),
    }
}
