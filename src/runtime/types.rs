use crate::sources::configs::SourceConfig;
use crate::types::{Chapter, LevelIndex, Section, SectionContent, SourceDocument, SourceKind, Title};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Already-fetched markup documents, addressed by path relative to their root.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<String>, String>;
    async fn read_document(&self, path: &str) -> Result<SourceDocument, String>;
}

/// Relational sink for normalized records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_record(&self, record: CorpusRecord) -> Result<(), String>;
    async fn flush(&self) -> Result<(), String>;
}

/// Keyed sink for per-section content objects and level indexes.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn store_content(&self, slug: &str, content: &SectionContent) -> Result<(), String>;
    async fn store_index(&self, slug: &str, index: &LevelIndex) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source_id: SourceKind,
    pub name: String,
    pub jurisdiction: String,
    pub region: String,
    pub doc_type: String,
    pub citation_prefix: String,
    pub slug: String,
    pub sort_order: i32,
    pub ingested_at: String,
}

impl SourceRecord {
    pub fn from_config(source: SourceKind, config: &SourceConfig) -> Self {
        Self {
            source_id: source,
            name: config.name.clone(),
            jurisdiction: config.jurisdiction.clone(),
            region: config.region.clone(),
            doc_type: config.doc_type.clone(),
            citation_prefix: config.citation_prefix.clone(),
            slug: config.slug.clone(),
            sort_order: config.sort_order,
            ingested_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record_type", content = "record", rename_all = "snake_case")]
pub enum CorpusRecord {
    Source(SourceRecord),
    Title(Title),
    Chapter(Chapter),
    Section(Box<Section>),
}

impl CorpusRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Source(_) => "source",
            Self::Title(_) => "title",
            Self::Chapter(_) => "chapter",
            Self::Section(_) => "section",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishStats {
    pub records: usize,
    pub documents: usize,
    pub indexes: usize,
}

pub enum JobStatus {
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Completed => "completed",
            JobStatus::Failed => "error",
        }
    }
}
