use crate::content::{
    chapter_index, chapter_slug, section_content, section_slug, title_index, title_slug,
};
use crate::corpus::Corpus;
use crate::ingest::{ingest_documents, IngestReport};
use crate::runtime::callbacks::{post_content, post_index, post_progress, post_record_batch};
use crate::runtime::logging::{log_event, LogLevel};
use crate::runtime::mirror::{read_documents, MirrorSource};
use crate::runtime::types::{
    ContentStore, CorpusRecord, JobStatus, PublishStats, RecordStore, SourceRecord,
};
use crate::sources::configs::{SourceConfig, SourcesConfig};
use crate::types::{IngestConfig, LevelIndex, SectionContent};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::sync::Mutex;

pub const BATCH_SIZE: usize = 200;

pub struct HttpRecordStore {
    client: Client,
    callback_base: String,
    callback_token: String,
    run_id: Option<String>,
    buffer: Mutex<Vec<CorpusRecord>>,
}

impl HttpRecordStore {
    pub fn new(client: Client, config: &IngestConfig) -> Self {
        Self {
            client,
            callback_base: config.callback_base.clone(),
            callback_token: config.callback_token.clone(),
            run_id: config.run_id.clone(),
            buffer: Mutex::new(Vec::with_capacity(BATCH_SIZE)),
        }
    }

    async fn send(&self, batch: Vec<CorpusRecord>) -> Result<(), String> {
        post_record_batch(
            &self.client,
            &self.callback_base,
            &self.callback_token,
            self.run_id.as_deref(),
            &batch,
        )
        .await
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn insert_record(&self, record: CorpusRecord) -> Result<(), String> {
        let batch = {
            let mut buffer = self.buffer.lock().map_err(|e| e.to_string())?;
            buffer.push(record);
            if buffer.len() >= BATCH_SIZE {
                Some(std::mem::take(&mut *buffer))
            } else {
                None
            }
        };

        if let Some(batch) = batch {
            self.send(batch).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), String> {
        let batch = {
            let mut buffer = self.buffer.lock().map_err(|e| e.to_string())?;
            if !buffer.is_empty() {
                Some(std::mem::take(&mut *buffer))
            } else {
                None
            }
        };

        if let Some(batch) = batch {
            self.send(batch).await?;
        }
        Ok(())
    }
}

pub struct HttpContentStore {
    client: Client,
    callback_base: String,
    callback_token: String,
}

impl HttpContentStore {
    pub fn new(client: Client, config: &IngestConfig) -> Self {
        Self {
            client,
            callback_base: config.callback_base.clone(),
            callback_token: config.callback_token.clone(),
        }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn store_content(&self, slug: &str, content: &SectionContent) -> Result<(), String> {
        post_content(
            &self.client,
            &self.callback_base,
            &self.callback_token,
            slug,
            content,
        )
        .await
    }

    async fn store_index(&self, slug: &str, index: &LevelIndex) -> Result<(), String> {
        post_index(
            &self.client,
            &self.callback_base,
            &self.callback_token,
            slug,
            index,
        )
        .await
    }
}

/// Writes the corpus to both sinks: the source, titles, chapters and sections
/// as records in canonical order, then one content object per section and
/// one index per title and chapter.
pub async fn publish_corpus(
    corpus: &Corpus,
    source_config: &SourceConfig,
    records: &dyn RecordStore,
    contents: &dyn ContentStore,
) -> Result<PublishStats, String> {
    let source = corpus.source();
    let mut stats = PublishStats::default();

    records
        .insert_record(CorpusRecord::Source(SourceRecord::from_config(
            source,
            source_config,
        )))
        .await?;
    stats.records += 1;

    for title in corpus.titles() {
        records.insert_record(CorpusRecord::Title(title.clone())).await?;
        stats.records += 1;
    }
    for chapter in corpus.chapters() {
        records
            .insert_record(CorpusRecord::Chapter(chapter.clone()))
            .await?;
        stats.records += 1;
    }
    for section in corpus.sections() {
        records
            .insert_record(CorpusRecord::Section(Box::new(section.clone())))
            .await?;
        stats.records += 1;
    }
    records.flush().await?;

    for section in corpus.sections() {
        let slug = section_slug(source, section);
        contents
            .store_content(&slug, &section_content(source, section))
            .await?;
        stats.documents += 1;
    }

    for title in corpus.titles() {
        contents
            .store_index(&title_slug(source, title), &title_index(corpus, title))
            .await?;
        stats.indexes += 1;
    }
    for chapter in corpus.chapters() {
        contents
            .store_index(&chapter_slug(source, chapter), &chapter_index(chapter))
            .await?;
        stats.indexes += 1;
    }

    tracing::info!(
        "[Runtime] Published {}: {} records, {} documents, {} indexes",
        source.as_str(),
        stats.records,
        stats.documents,
        stats.indexes
    );
    Ok(stats)
}

/// One ingest job: read the mirror, build the corpus off the async runtime,
/// publish it, then report progress.
pub async fn ingest_source(config: IngestConfig) -> Result<IngestReport, String> {
    let client = Client::new();
    let source = config.source;

    log_event(
        &client,
        &config,
        LogLevel::Info,
        "ingest_started",
        Some(json!({ "source": source.as_str(), "mirrorRoot": config.mirror_root })),
    )
    .await;

    let sources = SourcesConfig::load_default()?;
    let source_config = sources
        .get(source)
        .cloned()
        .ok_or_else(|| format!("No configuration for source {}", source.as_str()))?;

    let mirror = MirrorSource::new(&config.mirror_root);
    let documents = read_documents(&mirror).await?;
    tracing::info!(
        "[Runtime] Read {} documents from {}",
        documents.len(),
        config.mirror_root
    );

    let outcome = tokio::task::spawn_blocking(move || ingest_documents(source, &documents))
        .await
        .map_err(|e| format!("Ingest task failed: {e}"))?;

    let records = HttpRecordStore::new(client.clone(), &config);
    let contents = HttpContentStore::new(client.clone(), &config);

    if let Err(err) = publish_corpus(&outcome.corpus, &source_config, &records, &contents).await {
        post_progress(
            &client,
            &config.callback_base,
            &config.callback_token,
            config.run_id.as_deref(),
            JobStatus::Failed.as_str(),
            Some(&outcome.report),
        )
        .await;
        return Err(err);
    }

    post_progress(
        &client,
        &config.callback_base,
        &config.callback_token,
        config.run_id.as_deref(),
        JobStatus::Completed.as_str(),
        Some(&outcome.report),
    )
    .await;

    log_event(
        &client,
        &config,
        LogLevel::Info,
        "ingest_completed",
        Some(json!({ "report": outcome.report })),
    )
    .await;

    Ok(outcome.report)
}
