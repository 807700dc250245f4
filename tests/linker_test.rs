mod common;

use common::section;
use corpus_ingest::corpus::linker::link_sections;
use corpus_ingest::types::Section;

fn find<'a>(sections: &'a [Section], id: &str) -> &'a Section {
    sections
        .iter()
        .find(|section| section.section_id == id)
        .unwrap_or_else(|| panic!("missing section {id}"))
}

#[test]
fn test_links_within_agreeing_scopes() {
    let mut sections = vec![
        section("sec_1-3", Some("1"), Some("chap_1"), "1-3"),
        section("sec_1-1", Some("1"), Some("chap_1"), "1-1"),
        section("sec_1-2", Some("1"), Some("chap_1"), "1-2"),
    ];
    let stats = link_sections(&mut sections);

    let first = find(&sections, "sec_1-1");
    assert_eq!(first.prev_section_id, None);
    assert_eq!(first.next_section_id.as_deref(), Some("sec_1-2"));
    assert_eq!(first.next_section_label.as_deref(), Some("Sec. 1-2."));

    let middle = find(&sections, "sec_1-2");
    assert_eq!(middle.prev_section_id.as_deref(), Some("sec_1-1"));
    assert_eq!(middle.next_section_id.as_deref(), Some("sec_1-3"));

    let last = find(&sections, "sec_1-3");
    assert_eq!(last.next_section_id, None);

    assert_eq!(stats.linked, 4);
    assert_eq!(stats.suppressed, 0);
}

#[test]
fn test_disagreeing_scopes_suppress_link() {
    // Chapter order A, B, C; title order A, X, B, C.
    let mut sections = vec![
        section("A", Some("1"), Some("chap_1"), "1-1"),
        section("X", Some("1"), Some("chap_2"), "1-1a"),
        section("B", Some("1"), Some("chap_1"), "1-2"),
        section("C", Some("1"), Some("chap_1"), "1-3"),
    ];
    let stats = link_sections(&mut sections);

    let a = find(&sections, "A");
    assert_eq!(a.next_section_id, None);
    assert_eq!(a.next_section_label, None);

    let b = find(&sections, "B");
    assert_eq!(b.prev_section_id, None);
    assert_eq!(b.next_section_id.as_deref(), Some("C"));

    let c = find(&sections, "C");
    assert_eq!(c.prev_section_id.as_deref(), Some("B"));

    let x = find(&sections, "X");
    assert_eq!(x.prev_section_id, None);
    assert_eq!(x.next_section_id, None);

    assert_eq!(stats.linked, 2);
    assert_eq!(stats.suppressed, 4);
}

#[test]
fn test_sections_without_scope_are_never_linked() {
    let mut sections = vec![
        section("sec_1", None, Some("chap_1"), "1"),
        section("sec_2", None, Some("chap_1"), "2"),
    ];
    link_sections(&mut sections);

    assert!(sections
        .iter()
        .all(|section| section.prev_section_id.is_none() && section.next_section_id.is_none()));
}

#[test]
fn test_stale_links_are_cleared() {
    let mut stale = section("sec_5-1", Some("5"), Some("chap_5"), "5-1");
    stale.prev_section_id = Some("sec_gone".to_string());
    stale.next_section_id = Some("sec_gone".to_string());
    let mut sections = vec![stale];
    link_sections(&mut sections);

    assert_eq!(sections[0].prev_section_id, None);
    assert_eq!(sections[0].next_section_id, None);
}

#[test]
fn test_linking_is_stable() {
    let build = || {
        vec![
            section("sec_2-10", Some("2"), Some("chap_2"), "2-10"),
            section("sec_2-9", Some("2"), Some("chap_2"), "2-9"),
            section("sec_2-9a", Some("2"), Some("chap_3"), "2-9a"),
        ]
    };
    let mut once = build();
    link_sections(&mut once);
    let mut twice = once.clone();
    link_sections(&mut twice);

    assert_eq!(once, twice);
}
