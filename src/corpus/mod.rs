//! Per-source accumulation and the finalized, read-only corpus.
//!
//! [`CorpusBuilder`] is the single writer: front-end output is merged into it
//! document by document, replacing sections by `section_id`. [`CorpusBuilder::build`]
//! then runs the linker and the rollups once over the full collection and
//! yields a [`Corpus`] in canonical order.

pub mod linker;
pub mod rollup;

use crate::designator::{normalize_designator, NaturalKey};
use crate::sources::{ChapterInfo, DocumentExtract, TitleInfo};
use crate::types::{Chapter, Section, SourceKind, Title};
use linker::{link_sections, LinkStats};
use rollup::{rollup_chapters, rollup_titles};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    source: SourceKind,
    sections: Vec<Section>,
    index: HashMap<String, usize>,
    chapter_info: HashMap<String, ChapterInfo>,
    title_names: HashMap<String, String>,
    replaced: usize,
}

impl CorpusBuilder {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            sections: Vec::new(),
            index: HashMap::new(),
            chapter_info: HashMap::new(),
            title_names: HashMap::new(),
            replaced: 0,
        }
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections replaced by a later record with the same id.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// Inserts or replaces by `section_id`. Returns `true` on replacement.
    pub fn insert_section(&mut self, mut section: Section) -> bool {
        section.title_id = section
            .title_id
            .as_deref()
            .map(normalize_designator)
            .filter(|title_id| !title_id.is_empty());

        match self.index.get(&section.section_id) {
            Some(&position) => {
                self.sections[position] = section;
                self.replaced += 1;
                true
            }
            None => {
                self.index
                    .insert(section.section_id.clone(), self.sections.len());
                self.sections.push(section);
                false
            }
        }
    }

    /// Chapter metadata; a later record fills in a title the earlier one lacked.
    pub fn record_chapter(&mut self, info: ChapterInfo) {
        match self.chapter_info.get_mut(&info.chapter_id) {
            Some(existing) => {
                existing.chapter_number = info.chapter_number;
                if info.chapter_title.is_some() {
                    existing.chapter_title = info.chapter_title;
                }
            }
            None => {
                self.chapter_info.insert(info.chapter_id.clone(), info);
            }
        }
    }

    pub fn record_title(&mut self, info: TitleInfo) {
        let Some(name) = info.title_name.filter(|name| !name.is_empty()) else {
            return;
        };
        self.title_names
            .insert(normalize_designator(&info.title_id), name);
    }

    /// Merges one document's output. Returns how many sections it replaced.
    pub fn add_extract(&mut self, extract: DocumentExtract) -> usize {
        for chapter in extract.chapters {
            self.record_chapter(chapter);
        }
        for title in extract.titles {
            self.record_title(title);
        }
        let mut replaced = 0;
        for section in extract.sections {
            if self.insert_section(section) {
                replaced += 1;
            }
        }
        replaced
    }

    /// Links and rolls up the accumulated sections. Link fields and summaries
    /// are recomputed from scratch, so building twice yields the same corpus.
    pub fn build(self) -> Corpus {
        let mut sections = self.sections;
        sections.sort_by(|a, b| section_order(a).cmp(&section_order(b)));

        let link_stats = link_sections(&mut sections);

        let mut chapters = rollup_chapters(&sections, &self.chapter_info);
        chapters.sort_by(|a, b| chapter_order(a).cmp(&chapter_order(b)));
        let titles = rollup_titles(&sections, &chapters, &self.title_names);

        let index = sections
            .iter()
            .enumerate()
            .map(|(position, section)| (section.section_id.clone(), position))
            .collect();

        Corpus {
            source: self.source,
            sections,
            index,
            chapters,
            titles,
            link_stats,
            chapter_info: self.chapter_info,
            title_names: self.title_names,
        }
    }
}

fn section_order(section: &Section) -> (Option<NaturalKey>, NaturalKey, &str) {
    (
        section.title_id.as_deref().map(NaturalKey::new),
        NaturalKey::new(&section.ordering_designator()),
        section.section_id.as_str(),
    )
}

fn chapter_order(chapter: &Chapter) -> (Option<NaturalKey>, NaturalKey, &str) {
    (
        chapter.title_id.as_deref().map(NaturalKey::new),
        NaturalKey::new(&chapter.chapter_number),
        chapter.chapter_id.as_str(),
    )
}

/// A finalized per-source corpus. Sections, chapters and titles are held in
/// canonical (natural) order.
#[derive(Debug, Clone)]
pub struct Corpus {
    source: SourceKind,
    sections: Vec<Section>,
    index: HashMap<String, usize>,
    chapters: Vec<Chapter>,
    titles: Vec<Title>,
    link_stats: LinkStats,
    chapter_info: HashMap<String, ChapterInfo>,
    title_names: HashMap<String, String>,
}

impl Corpus {
    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn link_stats(&self) -> LinkStats {
        self.link_stats
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.index
            .get(section_id)
            .and_then(|position| self.sections.get(*position))
    }

    pub fn chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters
            .iter()
            .find(|chapter| chapter.chapter_id == chapter_id)
    }

    pub fn title(&self, title_id: &str) -> Option<&Title> {
        let title_id = normalize_designator(title_id);
        self.titles.iter().find(|title| title.title_id == title_id)
    }

    pub fn sections_in_chapter<'a>(
        &'a self,
        chapter_id: &'a str,
    ) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections
            .iter()
            .filter(move |section| section.chapter_id.as_deref() == Some(chapter_id))
    }

    pub fn chapters_in_title<'a>(
        &'a self,
        title_id: &'a str,
    ) -> impl Iterator<Item = &'a Chapter> + 'a {
        self.chapters
            .iter()
            .filter(move |chapter| chapter.title_id.as_deref() == Some(title_id))
    }

    /// Reopens the corpus for another accumulation pass.
    pub fn into_builder(self) -> CorpusBuilder {
        let index = self
            .sections
            .iter()
            .enumerate()
            .map(|(position, section)| (section.section_id.clone(), position))
            .collect();
        CorpusBuilder {
            source: self.source,
            sections: self.sections,
            index,
            chapter_info: self.chapter_info,
            title_names: self.title_names,
            replaced: 0,
        }
    }
}
