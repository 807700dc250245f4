mod common;

use common::{load_fixture, FailingContentStore, MockContentStore, MockRecordStore};
use corpus_ingest::ingest::ingest_documents;
use corpus_ingest::runtime::mirror::{read_documents, MirrorSource};
use corpus_ingest::runtime::orchestrator::publish_corpus;
use corpus_ingest::runtime::types::{CorpusRecord, DocumentSource};
use corpus_ingest::sources::configs::{SourceConfig, SourcesConfig};
use corpus_ingest::types::{SourceDocument, SourceKind};

fn write_cgs_mirror() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create mirror dir");
    let pub_dir = dir.path().join("pub");
    std::fs::create_dir_all(&pub_dir).expect("Failed to create pub dir");
    std::fs::write(pub_dir.join("chap_377a.htm"), load_fixture("cgs/chap_377a.htm"))
        .expect("Failed to write chapter page");
    std::fs::write(pub_dir.join("title_20.htm"), load_fixture("cgs/title_20.htm"))
        .expect("Failed to write title page");
    std::fs::write(dir.path().join("robots.txt"), "User-agent: *")
        .expect("Failed to write stray file");
    dir
}

fn source_config(source: SourceKind) -> SourceConfig {
    let path = format!("{}/configs/sources.json", env!("CARGO_MANIFEST_DIR"));
    SourcesConfig::load_from_file(&path)
        .expect("Failed to load shipped config")
        .get(source)
        .cloned()
        .expect("source configured")
}

// ============================================================
// Mirror
// ============================================================

#[tokio::test]
async fn test_mirror_lists_files_recursively_in_order() {
    let dir = write_cgs_mirror();
    let mirror = MirrorSource::new(dir.path());

    let paths = mirror.list_documents().await.expect("listing");
    assert_eq!(
        paths,
        vec!["pub/chap_377a.htm", "pub/title_20.htm", "robots.txt"]
    );

    let document = mirror.read_document("pub/title_20.htm").await.expect("read");
    assert_eq!(document.path, "pub/title_20.htm");
    assert!(document.markup.contains("Professional and Occupational Licensing"));
}

#[tokio::test]
async fn test_mirror_missing_root_is_an_error() {
    let mirror = MirrorSource::new("/nonexistent/mirror/root");
    let err = mirror.list_documents().await.unwrap_err();
    assert!(err.contains("Failed to read directory"));
}

#[tokio::test]
async fn test_stray_files_are_skipped() {
    let dir = write_cgs_mirror();
    let documents = read_documents(&MirrorSource::new(dir.path()))
        .await
        .expect("read mirror");
    let outcome = ingest_documents(SourceKind::Cgs, &documents);

    assert_eq!(outcome.report.documents_read, 2);
    assert_eq!(outcome.report.documents_skipped, 1);
    assert_eq!(outcome.corpus.sections().len(), 3);
}

// ============================================================
// Publishing
// ============================================================

#[tokio::test]
async fn test_publish_writes_records_in_canonical_order() {
    let dir = write_cgs_mirror();
    let documents = read_documents(&MirrorSource::new(dir.path()))
        .await
        .expect("read mirror");
    let corpus = ingest_documents(SourceKind::Cgs, &documents).corpus;

    let records = MockRecordStore::new();
    let contents = MockContentStore::new();
    let stats = publish_corpus(&corpus, &source_config(SourceKind::Cgs), &records, &contents)
        .await
        .expect("publish");

    assert_eq!(
        records.kinds(),
        vec!["source", "title", "chapter", "section", "section", "section"]
    );
    assert_eq!(*records.flushes.lock().unwrap(), 1);
    assert_eq!(stats.records, 6);
    assert_eq!(stats.documents, 3);
    assert_eq!(stats.indexes, 2);

    let first = records.records.lock().unwrap()[0].clone();
    match first {
        CorpusRecord::Source(source) => {
            assert_eq!(source.source_id, SourceKind::Cgs);
            assert_eq!(source.citation_prefix, "Conn. Gen. Stat. §");
            assert!(!source.ingested_at.is_empty());
        }
        other => panic!("expected the source record first, got {}", other.kind()),
    }
}

#[tokio::test]
async fn test_publish_stores_content_and_indexes() {
    let documents = vec![
        SourceDocument::new("pub/chap_377a.htm", load_fixture("cgs/chap_377a.htm")),
        SourceDocument::new("pub/title_20.htm", load_fixture("cgs/title_20.htm")),
    ];
    let corpus = ingest_documents(SourceKind::Cgs, &documents).corpus;

    let records = MockRecordStore::new();
    let contents = MockContentStore::new();
    publish_corpus(&corpus, &source_config(SourceKind::Cgs), &records, &contents)
        .await
        .expect("publish");

    let content = contents
        .content("statutes/cgs/section/20/20-86bb")
        .expect("certification content");
    assert_eq!(content.doc_id, "doc_cgs_20-86bb");
    assert!(content.blocks[0].content.contains("Fee | $100"));

    let index_slugs = contents
        .indexes
        .lock()
        .unwrap()
        .iter()
        .map(|(slug, _)| slug.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        index_slugs,
        vec!["statutes/cgs/title/20", "statutes/cgs/chapter/20/377a"]
    );
}

#[tokio::test]
async fn test_publish_surfaces_sink_errors() {
    let documents = vec![SourceDocument::new(
        "pub/chap_377a.htm",
        load_fixture("cgs/chap_377a.htm"),
    )];
    let corpus = ingest_documents(SourceKind::Cgs, &documents).corpus;

    let records = MockRecordStore::new();
    let err = publish_corpus(
        &corpus,
        &source_config(SourceKind::Cgs),
        &records,
        &FailingContentStore,
    )
    .await
    .unwrap_err();

    assert!(err.contains("store rejected statutes/cgs/section/20/20-86aa"));
}
