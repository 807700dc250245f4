use crate::designator::{
    format_designator_display, format_designator_padded, split_range, NaturalKey,
};
use crate::sources::ChapterInfo;
use crate::types::{Chapter, Section, Title};
use std::collections::{BTreeMap, HashMap};

fn keep_min(slot: &mut Option<String>, candidate: &str) {
    let replace = slot
        .as_deref()
        .map_or(true, |current| NaturalKey::new(candidate) < NaturalKey::new(current));
    if replace {
        *slot = Some(candidate.to_string());
    }
}

fn keep_max(slot: &mut Option<String>, candidate: &str) {
    let replace = slot
        .as_deref()
        .map_or(true, |current| NaturalKey::new(candidate) > NaturalKey::new(current));
    if replace {
        *slot = Some(candidate.to_string());
    }
}

fn observed(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Start and end candidates contributed by one section. Sections without an
/// observed designator contribute none.
fn range_candidates(section: &Section) -> Option<(String, String)> {
    let number = section
        .section_number
        .as_deref()
        .map(str::trim)
        .filter(|number| !number.is_empty());
    let (first, last) = number.map_or((None, None), |number| {
        let (first, last) = split_range(number);
        (Some(first), Some(last))
    });
    let start = observed(&section.range_start).or(first)?;
    let end = observed(&section.range_end).or(last).unwrap_or(start);
    Some((start.to_string(), end.to_string()))
}

/// Materializes one chapter per distinct `chapter_id`, in first-seen order.
pub fn rollup_chapters(
    sections: &[Section],
    chapter_info: &HashMap<String, ChapterInfo>,
) -> Vec<Chapter> {
    let mut order: Vec<String> = Vec::new();
    let mut chapters: HashMap<String, Chapter> = HashMap::new();

    for section in sections {
        let Some(chapter_id) = section.chapter_id.as_deref() else {
            continue;
        };

        let chapter = chapters.entry(chapter_id.to_string()).or_insert_with(|| {
            order.push(chapter_id.to_string());
            let info = chapter_info.get(chapter_id);
            let number = info.map_or(chapter_id, |info| info.chapter_number.as_str());
            let mut chapter = Chapter::new(chapter_id, number);
            chapter.chapter_title = info.and_then(|info| info.chapter_title.clone());
            chapter
        });

        chapter.section_count += 1;

        if let Some((start, end)) = range_candidates(section) {
            keep_min(&mut chapter.section_start, &start);
            keep_max(&mut chapter.section_end, &end);
        }

        if chapter.title_id.is_none() {
            if let Some(title_id) = section.title_id.as_deref() {
                chapter.title_id = Some(title_id.to_string());
                chapter.title_id_padded = Some(format_designator_padded(title_id));
                chapter.title_id_display = Some(format_designator_display(title_id));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|chapter_id| chapters.remove(&chapter_id))
        .collect()
}

/// Materializes one title per distinct section `title_id`, in natural order.
pub fn rollup_titles(
    sections: &[Section],
    chapters: &[Chapter],
    title_names: &HashMap<String, String>,
) -> Vec<Title> {
    let mut titles: BTreeMap<(NaturalKey, String), Title> = BTreeMap::new();

    for section in sections {
        let Some(title_id) = section.title_id.as_deref() else {
            continue;
        };
        let title = titles
            .entry((NaturalKey::new(title_id), title_id.to_string()))
            .or_insert_with(|| {
                let mut title = Title::new(title_id);
                title.title_name = title_names.get(&title.title_id).cloned();
                title
            });
        title.section_count += 1;
    }

    for chapter in chapters {
        let Some(title_id) = chapter.title_id.as_deref() else {
            continue;
        };
        if let Some(title) = titles.get_mut(&(NaturalKey::new(title_id), title_id.to_string())) {
            title.chapter_count += 1;
        }
    }

    titles.into_values().collect()
}
