mod common;

use common::{fixture_document, section};
use corpus_ingest::content::{
    chapter_index, chapter_slug, doc_id, section_content, section_slug, title_index, title_slug,
    CONTENT_VERSION,
};
use corpus_ingest::ingest::ingest_documents;
use corpus_ingest::types::{BlockKind, LevelIndex, SourceKind};

#[test]
fn test_section_slugs_and_doc_ids() {
    let cgs = section("sec_20-86aa", Some("20"), Some("chap_377a"), "20-86aa");
    assert_eq!(
        section_slug(SourceKind::Cgs, &cgs),
        "statutes/cgs/section/20/20-86aa"
    );
    assert_eq!(doc_id(SourceKind::Cgs, &cgs), "doc_cgs_20-86aa");

    let range = section("secs_1-1", Some("1"), None, "1-1 to 1-5");
    assert_eq!(
        section_slug(SourceKind::Cgs, &range),
        "statutes/cgs/section/1/1-1_to_1-5"
    );

    let usc = section("/us/usc/t5/s552a", Some("5"), Some("5-5"), "552a");
    assert_eq!(section_slug(SourceKind::Usc, &usc), "statutes/usc/section/5/552a");
    assert_eq!(doc_id(SourceKind::Usc, &usc), "doc_usc_5-552a");
}

#[test]
fn test_slug_without_title_or_number() {
    let mut orphan = section("sec_intro", None, None, "intro");
    orphan.section_number = None;
    assert_eq!(section_slug(SourceKind::Cgs, &orphan), "statutes/cgs/section/intro");
}

#[test]
fn test_content_blocks_in_fixed_order() {
    let mut record = section("sec_1-1", Some("1"), None, "1-1");
    record.blocks.body = "Body.".to_string();
    record.blocks.history_long = "History.".to_string();
    record.blocks.citations = "Cited.".to_string();
    record.blocks.see_also = "See also.".to_string();

    let content = section_content(SourceKind::Cgs, &record);
    assert_eq!(content.version, CONTENT_VERSION);
    assert_eq!(content.doc_type, "statute");

    let blocks = content
        .blocks
        .iter()
        .map(|block| (block.kind, block.label.as_deref(), block.content.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        blocks,
        vec![
            (BlockKind::Body, None, "Body."),
            (BlockKind::HistoryLong, Some("History Notes"), "History."),
            (BlockKind::Citations, Some("Citations"), "Cited."),
        ]
    );
}

#[test]
fn test_body_block_present_when_empty() {
    let record = section("secs_9-1", Some("9"), None, "9-1 to 9-4");
    let content = section_content(SourceKind::Usc, &record);

    assert_eq!(content.blocks.len(), 1);
    assert_eq!(content.blocks[0].kind, BlockKind::Body);
    assert_eq!(content.blocks[0].content, "");
}

#[test]
fn test_usc_notes_label() {
    let mut record = section("/us/usc/t1/s1", Some("1"), None, "1");
    record.blocks.citations = "Short Title\nDictionary Act.".to_string();
    let content = section_content(SourceKind::Usc, &record);
    assert_eq!(content.blocks[1].label.as_deref(), Some("Notes"));
}

#[test]
fn test_content_serializes_block_type() {
    let mut record = section("sec_1-1", Some("1"), None, "1-1");
    record.blocks.history_short = "(P.A. 1.)".to_string();
    let json = serde_json::to_value(section_content(SourceKind::Cgs, &record)).unwrap();

    assert_eq!(json["blocks"][0]["type"], "body");
    assert!(json["blocks"][0].get("label").is_none());
    assert_eq!(json["blocks"][1]["type"], "history_short");
    assert_eq!(json["blocks"][1]["label"], "History");
}

#[test]
fn test_level_indexes_for_fixture_corpus() {
    let documents = vec![
        fixture_document("cgs/chap_377a.htm", "pub/chap_377a.htm"),
        fixture_document("cgs/title_20.htm", "pub/title_20.htm"),
    ];
    let corpus = ingest_documents(SourceKind::Cgs, &documents).corpus;
    let title = corpus.title("20").expect("title 20");
    let chapter = corpus.chapter("chap_377a").expect("chapter 377a");

    assert_eq!(title_slug(SourceKind::Cgs, title), "statutes/cgs/title/20");
    assert_eq!(
        chapter_slug(SourceKind::Cgs, chapter),
        "statutes/cgs/chapter/20/377a"
    );

    match title_index(&corpus, title) {
        LevelIndex::Title {
            title_name,
            chapters,
            ..
        } => {
            assert_eq!(
                title_name.as_deref(),
                Some("Professional and Occupational Licensing")
            );
            assert_eq!(chapters.len(), 1);
            assert_eq!(chapters[0].identifier, "chap_377a");
            assert_eq!(chapters[0].display, "377A");
            assert_eq!(chapters[0].heading.as_deref(), Some("Doulas"));
        }
        other => panic!("expected a title index, got {other:?}"),
    }

    let json = serde_json::to_value(chapter_index(chapter)).unwrap();
    assert_eq!(json["level_type"], "chapter");
    assert_eq!(json["section_count"], 3);
    assert_eq!(json["section_start"], "20-86aa");
    assert_eq!(json["section_end"], "20-86ee");
}
