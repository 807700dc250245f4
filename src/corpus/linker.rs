//! Prev/next adjacency over two scopes.
//!
//! Sections are ordered once within their chapter and once within their
//! title. A neighbor is linked only when both orderings name the same
//! section; any disagreement leaves the link empty.

use crate::designator::NaturalKey;
use crate::types::Section;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Prev or next links assigned.
    pub linked: usize,
    /// Prev or next links withheld because the scopes disagreed.
    pub suppressed: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Neighbors {
    prev: Option<usize>,
    next: Option<usize>,
}

fn order_key(section: &Section) -> (NaturalKey, &str) {
    (
        NaturalKey::new(&section.ordering_designator()),
        section.section_id.as_str(),
    )
}

/// Neighbors of each section within its partition, sorted by natural key.
fn scoped_neighbors<'a, F>(sections: &'a [Section], scope: F) -> Vec<Neighbors>
where
    F: Fn(&'a Section) -> Option<&'a str>,
{
    let mut partitions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, section) in sections.iter().enumerate() {
        if let Some(key) = scope(section) {
            partitions.entry(key).or_default().push(index);
        }
    }

    let keys = sections.iter().map(order_key).collect::<Vec<_>>();
    let mut neighbors = vec![Neighbors::default(); sections.len()];
    for members in partitions.values_mut() {
        members.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
        for (position, &index) in members.iter().enumerate() {
            neighbors[index] = Neighbors {
                prev: position.checked_sub(1).map(|prev| members[prev]),
                next: members.get(position + 1).copied(),
            };
        }
    }
    neighbors
}

fn resolve(chapter: Option<usize>, title: Option<usize>, stats: &mut LinkStats) -> Option<usize> {
    match (chapter, title) {
        (Some(a), Some(b)) if a == b => {
            stats.linked += 1;
            Some(a)
        }
        (None, None) => None,
        _ => {
            stats.suppressed += 1;
            None
        }
    }
}

/// Recomputes every section's prev/next fields from scratch.
pub fn link_sections(sections: &mut [Section]) -> LinkStats {
    let by_chapter = scoped_neighbors(sections, |section| section.chapter_id.as_deref());
    let by_title = scoped_neighbors(sections, |section| section.title_id.as_deref());

    let mut stats = LinkStats::default();
    let links = by_chapter
        .iter()
        .zip(&by_title)
        .map(|(chapter, title)| {
            (
                resolve(chapter.prev, title.prev, &mut stats),
                resolve(chapter.next, title.next, &mut stats),
            )
        })
        .collect::<Vec<_>>();

    let identities = sections
        .iter()
        .map(|section| (section.section_id.clone(), section.section_label.clone()))
        .collect::<Vec<_>>();

    for (section, (prev, next)) in sections.iter_mut().zip(links) {
        let prev = prev.map(|index| &identities[index]);
        let next = next.map(|index| &identities[index]);
        section.prev_section_id = prev.map(|(id, _)| id.clone());
        section.prev_section_label = prev.map(|(_, label)| label.clone());
        section.next_section_id = next.map(|(id, _)| id.clone());
        section.next_section_label = next.map(|(_, label)| label.clone());
    }

    stats
}
