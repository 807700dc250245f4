#![allow(dead_code)]
use async_trait::async_trait;
use corpus_ingest::runtime::types::{ContentStore, CorpusRecord, RecordStore};
use corpus_ingest::types::{LevelIndex, Section, SectionContent, SourceDocument};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

pub fn load_fixture(filename: &str) -> String {
    let path = Path::new(&fixtures_dir()).join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// A fixture wrapped as a mirrored document at `path`.
pub fn fixture_document(filename: &str, path: &str) -> SourceDocument {
    SourceDocument::new(path, load_fixture(filename))
}

/// A bare section for linker and rollup tests. `number` may be a `"first to last"` range.
pub fn section(id: &str, title: Option<&str>, chapter: Option<&str>, number: &str) -> Section {
    let mut section = Section::new(id, format!("Sec. {number}."));
    section.title_id = title.map(ToString::to_string);
    section.chapter_id = chapter.map(ToString::to_string);
    section.section_number = Some(number.to_string());
    let (start, end) = match number.split_once(" to ") {
        Some((start, end)) => (start, end),
        None => (number, number),
    };
    section.range_start = Some(start.to_string());
    section.range_end = Some(end.to_string());
    section
}

#[derive(Clone, Default)]
pub struct MockRecordStore {
    pub records: Arc<Mutex<Vec<CorpusRecord>>>,
    pub flushes: Arc<Mutex<usize>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(CorpusRecord::kind)
            .collect()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn insert_record(&self, record: CorpusRecord) -> Result<(), String> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn flush(&self) -> Result<(), String> {
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockContentStore {
    pub contents: Arc<Mutex<Vec<(String, SectionContent)>>>,
    pub indexes: Arc<Mutex<Vec<(String, LevelIndex)>>>,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, slug: &str) -> Option<SectionContent> {
        self.contents
            .lock()
            .unwrap()
            .iter()
            .find(|(stored, _)| stored == slug)
            .map(|(_, content)| content.clone())
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn store_content(&self, slug: &str, content: &SectionContent) -> Result<(), String> {
        self.contents
            .lock()
            .unwrap()
            .push((slug.to_string(), content.clone()));
        Ok(())
    }

    async fn store_index(&self, slug: &str, index: &LevelIndex) -> Result<(), String> {
        self.indexes
            .lock()
            .unwrap()
            .push((slug.to_string(), index.clone()));
        Ok(())
    }
}

/// Content sink that rejects every write.
pub struct FailingContentStore;

#[async_trait]
impl ContentStore for FailingContentStore {
    async fn store_content(&self, slug: &str, _content: &SectionContent) -> Result<(), String> {
        Err(format!("store rejected {slug}"))
    }

    async fn store_index(&self, slug: &str, _index: &LevelIndex) -> Result<(), String> {
        Err(format!("store rejected {slug}"))
    }
}
