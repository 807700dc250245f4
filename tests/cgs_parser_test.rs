mod common;

use common::fixture_document;
use corpus_ingest::sources::cgs::adapter::CGS_ADAPTER;
use corpus_ingest::sources::cgs::label::{extract_title_id, parse_label};
use corpus_ingest::sources::cgs::parser::{
    chapter_number_from_stem, clean_chapter_title, extract_chapter_title, extract_title_name,
    parse_fragment, split_sections, title_id_from_stem,
};
use corpus_ingest::sources::{ExtractWarning, SourceAdapter};
use corpus_ingest::types::SourceDocument;

// ============================================================
// Label grammar
// ============================================================

#[test]
fn test_parse_single_label() {
    let parsed = parse_label("Sec. 12-100. Definitions.");
    assert_eq!(parsed.number.as_deref(), Some("12-100"));
    assert_eq!(parsed.title.as_deref(), Some("Definitions."));
    assert_eq!(parsed.range_start.as_deref(), Some("12-100"));
    assert_eq!(parsed.range_end.as_deref(), Some("12-100"));
    assert!(!parsed.is_range());
}

#[test]
fn test_parse_range_label() {
    let parsed = parse_label("Secs. 1-1 to 1-5. General Provisions.");
    assert_eq!(parsed.number.as_deref(), Some("1-1 to 1-5"));
    assert_eq!(parsed.range_start.as_deref(), Some("1-1"));
    assert_eq!(parsed.range_end.as_deref(), Some("1-5"));
    assert_eq!(parsed.title.as_deref(), Some("General Provisions."));
    assert!(parsed.is_range());
}

#[test]
fn test_plural_label_without_to_is_not_a_range() {
    let parsed = parse_label("Secs. 4-1, 4-2. Repealed.");
    assert_eq!(parsed.number.as_deref(), Some("4-1, 4-2"));
    assert_eq!(parsed.range_start.as_deref(), Some("4-1, 4-2"));
    assert!(!parsed.is_range());
}

#[test]
fn test_unparseable_label_yields_empty_fields() {
    let parsed = parse_label("Preamble");
    assert_eq!(parsed.number, None);
    assert_eq!(parsed.title, None);
    assert_eq!(parsed.range_start, None);
    assert_eq!(parsed.range_end, None);
}

#[test]
fn test_title_id_from_designator_prefix() {
    assert_eq!(
        extract_title_id("sec_12-100", Some("12-100"), Some("12-100")).as_deref(),
        Some("12")
    );
    assert_eq!(
        extract_title_id("secs_1-1", Some("1-1 to 1-5"), Some("1-1")).as_deref(),
        Some("1")
    );
    assert_eq!(extract_title_id("sec_4a-7", Some("7"), None).as_deref(), Some("4a"));
    assert_eq!(extract_title_id("sec_x", None, None), None);
}

// ============================================================
// Section boundary splitting
// ============================================================

#[test]
fn test_split_sections_between_anchors() {
    let html = concat!(
        "<html><body><p>Preamble</p>",
        r#"<p><span class="catchln" id="sec_1-1">Sec. 1-1. First.</span> One.</p>"#,
        r#"<p><span id="sec_1-2" class="catchln">Sec. 1-2. Second.</span> Two.</p>"#,
        "</body></html>",
    );
    let fragments = split_sections(html);

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].section_id, "sec_1-1");
    assert_eq!(fragments[1].section_id, "sec_1-2");
    assert_eq!(fragments[0].end, fragments[1].start);
    assert_eq!(fragments[1].end, html.len());
    assert!(fragments[0].markup.starts_with("<span"));
    assert!(!fragments[0].markup.contains("Two."));
    assert!(!fragments[0].markup.contains("Preamble"));
}

#[test]
fn test_split_ignores_other_spans() {
    let html = r#"<span class="toc_catchln" id="toc_1">Sec. 1-1.</span><span class="catchln">No id.</span><span class="catchln" id="sec_1-1">Sec. 1-1. Real.</span>"#;
    let fragments = split_sections(html);

    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].section_id, "sec_1-1");
}

#[test]
fn test_split_without_anchors_is_empty() {
    assert!(split_sections("<html><body><p>Nothing here.</p></body></html>").is_empty());
}

// ============================================================
// Fragment assembly
// ============================================================

#[test]
fn test_parse_fragment_assembles_section() {
    let html = r#"<p><span class="catchln" id="sec_12-100">Sec. 12-100. Definitions.</span> Body text.</p><p>ARTICLE II</p>"#;
    let fragments = split_sections(html);
    let mut warnings = Vec::new();
    let section = parse_fragment(&fragments[0], "chap_201", "chap_201.htm", &mut warnings);

    assert!(warnings.is_empty());
    assert_eq!(section.section_id, "sec_12-100");
    assert_eq!(section.section_label, "Sec. 12-100. Definitions.");
    assert_eq!(section.section_number.as_deref(), Some("12-100"));
    assert_eq!(section.section_title.as_deref(), Some("Definitions."));
    assert_eq!(section.title_id.as_deref(), Some("12"));
    assert_eq!(section.chapter_id.as_deref(), Some("chap_201"));
    assert_eq!(section.blocks.body, "Body text.");
    assert_eq!(section.source_file, "chap_201.htm");
}

#[test]
fn test_unparseable_label_is_reported_and_fields_stay_empty() {
    let html = r#"<p><span class="catchln" id="sec_intro">Introduction</span> Text.</p>"#;
    let fragments = split_sections(html);
    let mut warnings = Vec::new();
    let section = parse_fragment(&fragments[0], "", "intro.htm", &mut warnings);

    assert_eq!(section.section_label, "Introduction");
    assert_eq!(section.section_number, None);
    assert_eq!(section.title_id, None);
    assert_eq!(section.chapter_id, None);
    assert_eq!(
        warnings,
        vec![
            ExtractWarning::UnparseableLabel {
                section_id: "sec_intro".to_string(),
                label: "Introduction".to_string(),
            },
            ExtractWarning::MissingTitle {
                section_id: "sec_intro".to_string(),
            },
        ]
    );
}

#[test]
fn test_empty_catch_line_falls_back_to_section_id() {
    let html = r#"<p><span class="catchln" id="sec_9-9"></span> Text.</p>"#;
    let fragments = split_sections(html);
    let mut warnings = Vec::new();
    let section = parse_fragment(&fragments[0], "chap_9", "chap_9.htm", &mut warnings);

    assert_eq!(section.section_label, "sec_9-9");
    assert_eq!(section.section_number, None);
    assert_eq!(warnings.len(), 2);
}

// ============================================================
// Page metadata
// ============================================================

#[test]
fn test_chapter_title_from_page_title() {
    let html = "<html><head><title>Chapter 377a - Doulas</title></head></html>";
    assert_eq!(extract_chapter_title(html).as_deref(), Some("Doulas"));
}

#[test]
fn test_chapter_title_falls_back_to_description() {
    let html = r#"<html><head><meta name="Description" content="Article 2 - Sales"></head></html>"#;
    assert_eq!(extract_chapter_title(html).as_deref(), Some("Sales"));
    assert_eq!(clean_chapter_title("Untitled page"), "Untitled page");
}

#[test]
fn test_title_name_and_stems() {
    let html = "<title>Title 20 - Professional and Occupational Licensing</title>";
    assert_eq!(
        extract_title_name(html).as_deref(),
        Some("Professional and Occupational Licensing")
    );
    assert_eq!(chapter_number_from_stem("chap_377a"), "377a");
    assert_eq!(chapter_number_from_stem("art_002"), "002");
    assert_eq!(title_id_from_stem("title_47a"), Some("47a"));
    assert_eq!(title_id_from_stem("chap_1"), None);
}

// ============================================================
// Adapter over a chapter page
// ============================================================

#[test]
fn test_chapter_page_extract() {
    let document = fixture_document("cgs/chap_377a.htm", "pub/chap_377a.htm");
    let extract = CGS_ADAPTER.extract(&document);

    assert!(extract.warnings.is_empty(), "{:?}", extract.warnings);
    assert_eq!(extract.chapters.len(), 1);
    assert_eq!(extract.chapters[0].chapter_id, "chap_377a");
    assert_eq!(extract.chapters[0].chapter_number, "377a");
    assert_eq!(extract.chapters[0].chapter_title.as_deref(), Some("Doulas"));

    let ids = extract
        .sections
        .iter()
        .map(|section| section.section_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["sec_20-86aa", "sec_20-86bb", "secs_20-86cc"]);
}

#[test]
fn test_chapter_page_blocks() {
    let document = fixture_document("cgs/chap_377a.htm", "pub/chap_377a.htm");
    let extract = CGS_ADAPTER.extract(&document);
    let definitions = &extract.sections[0];
    let certification = &extract.sections[1];
    let reserved = &extract.sections[2];

    assert!(definitions.blocks.body.starts_with("As used in this chapter:"));
    assert!(definitions
        .blocks
        .body
        .contains("(1) \u{201c}Doula\u{201d} means a trained, nonmedical professional; and"));
    assert!(definitions.blocks.body.ends_with("Commissioner of Public Health."));
    assert_eq!(definitions.blocks.history_short, "(P.A. 23-147, S. 1.)");
    assert_eq!(
        definitions.blocks.history_long,
        "History: P.A. 23-147 effective July 1, 2023."
    );

    assert!(certification.blocks.body.contains("Fee | $100\nRenewal | $50"));
    assert!(!certification.blocks.body.contains("PART II"));
    assert_eq!(certification.blocks.history_short, "(P.A. 23-147, S. 2.)");
    assert_eq!(certification.blocks.citations, "Cited. 210 C. 1.");
    assert_eq!(certification.blocks.see_also, "See Sec. 20-86aa for definitions.");

    assert_eq!(reserved.section_number.as_deref(), Some("20-86cc to 20-86ee"));
    assert_eq!(reserved.range_start.as_deref(), Some("20-86cc"));
    assert_eq!(reserved.range_end.as_deref(), Some("20-86ee"));
    assert_eq!(reserved.title_id.as_deref(), Some("20"));
    assert_eq!(reserved.blocks.body, "");
}

#[test]
fn test_title_page_contributes_name_only() {
    let document = fixture_document("cgs/title_20.htm", "pub/title_20.htm");
    let extract = CGS_ADAPTER.extract(&document);

    assert!(extract.sections.is_empty());
    assert!(extract.chapters.is_empty());
    assert_eq!(extract.titles.len(), 1);
    assert_eq!(extract.titles[0].title_id, "20");
    assert_eq!(
        extract.titles[0].title_name.as_deref(),
        Some("Professional and Occupational Licensing")
    );
}

#[test]
fn test_page_without_sections_contributes_nothing() {
    let document = SourceDocument::new("pub/titles.htm", "<html><body><p>Index</p></body></html>");
    assert!(CGS_ADAPTER.extract(&document).is_empty());
}

#[test]
fn test_extraction_is_stable() {
    let document = fixture_document("cgs/chap_377a.htm", "pub/chap_377a.htm");
    assert_eq!(CGS_ADAPTER.extract(&document), CGS_ADAPTER.extract(&document));
}
