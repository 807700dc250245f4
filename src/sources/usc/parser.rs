//! Streaming walk over a USLM title document.
//!
//! The walk tracks the most recently opened chapter as ambient context and
//! completes one [`Section`] per top-level `<section>` element. Text inside a
//! section is routed by element role: direct `num`/`heading` become the label,
//! `sourceCredit` the short history, `note` elements the long history or
//! citations, and everything else the body.

use crate::sources::usc::identifier::{clean_designator, UscIdentifier};
use crate::sources::{ChapterInfo, ExtractWarning};
use crate::text::{collapse_text, normalize_paragraphs};
use crate::types::Section;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Sub-levels of a section; each starts and ends a body paragraph.
fn is_level_tag(tag: &str) -> bool {
    matches!(
        tag,
        "subsection"
            | "paragraph"
            | "subparagraph"
            | "clause"
            | "subclause"
            | "item"
            | "subitem"
            | "subsubitem"
    )
}

/// Text containers; closing one ends the current body paragraph, so a
/// sub-level's `num` stays on the same line as its text.
fn is_text_container(tag: &str) -> bool {
    matches!(tag, "chapeau" | "continuation" | "content" | "p")
}

#[derive(Debug, Default)]
pub struct UscDocument {
    pub title_id: Option<String>,
    pub title_name: Option<String>,
    pub chapters: Vec<ChapterInfo>,
    pub sections: Vec<Section>,
    pub warnings: Vec<ExtractWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelPart {
    Num,
    Heading,
}

#[derive(Debug, Default)]
struct NoteBuilder {
    depth: usize,
    topic: String,
    role: String,
    heading: String,
    heading_depth: Option<usize>,
    paragraphs: Vec<String>,
    current: String,
}

impl NoteBuilder {
    fn flush(&mut self) {
        let text = collapse_text(&self.current);
        if !text.is_empty() {
            self.paragraphs.push(text);
        }
        self.current.clear();
    }
}

#[derive(Debug, Default)]
struct SectionBuilder {
    depth: usize,
    identifier: Option<String>,
    num: String,
    heading: String,
    label_part: Option<(LabelPart, usize)>,
    paragraphs: Vec<String>,
    current: String,
    credit: String,
    credit_depth: usize,
    notes_depth: usize,
    ignore_depth: usize,
    note: Option<NoteBuilder>,
    history: Vec<String>,
    citations: Vec<String>,
}

impl SectionBuilder {
    fn flush_paragraph(&mut self) {
        let text = collapse_text(&self.current);
        if !text.is_empty() {
            self.paragraphs.push(text);
        }
        self.current.clear();
    }

    fn text(&mut self, text: &str) {
        if self.ignore_depth > 0 {
            return;
        }
        if let Some((part, _)) = self.label_part {
            match part {
                LabelPart::Num => self.num.push_str(text),
                LabelPart::Heading => self.heading.push_str(text),
            }
            return;
        }
        if self.credit_depth > 0 {
            self.credit.push_str(text);
            return;
        }
        if let Some(note) = self.note.as_mut() {
            if note.heading_depth.is_some() {
                note.heading.push_str(text);
            } else {
                note.current.push_str(text);
            }
            return;
        }
        if self.notes_depth > 0 {
            return;
        }
        self.current.push_str(text);
    }

    fn open(&mut self, tag: &str, depth: usize, element: &BytesStart<'_>) {
        if self.ignore_depth > 0 || tag == "footnoteRef" {
            self.ignore_depth += 1;
            return;
        }

        if depth == self.depth + 1 && self.label_part.is_none() {
            match tag {
                "num" => {
                    self.label_part = Some((LabelPart::Num, depth));
                    return;
                }
                "heading" => {
                    self.label_part = Some((LabelPart::Heading, depth));
                    return;
                }
                _ => {}
            }
        }

        match tag {
            "sourceCredit" => {
                self.credit_depth += 1;
                self.credit.push(' ');
                return;
            }
            "notes" => {
                self.notes_depth += 1;
                return;
            }
            "note" if self.note.is_none() => {
                self.note = Some(NoteBuilder {
                    depth,
                    topic: attribute(element, "topic").unwrap_or_default(),
                    role: attribute(element, "role").unwrap_or_default(),
                    ..NoteBuilder::default()
                });
                return;
            }
            _ => {}
        }

        if let Some(note) = self.note.as_mut() {
            if tag == "heading" && note.heading_depth.is_none() && note.heading.is_empty() {
                note.heading_depth = Some(depth);
            } else if tag == "p" {
                note.flush();
            }
            return;
        }

        if self.credit_depth == 0 && self.notes_depth == 0 {
            if is_level_tag(tag) {
                self.flush_paragraph();
            } else if tag == "num" || tag == "heading" {
                self.current.push(' ');
            }
        }
    }

    fn close(&mut self, tag: &str, depth: usize) {
        if self.ignore_depth > 0 {
            self.ignore_depth -= 1;
            return;
        }

        if self.label_part.is_some_and(|(_, label_depth)| label_depth == depth) {
            self.label_part = None;
            return;
        }

        match tag {
            "sourceCredit" if self.credit_depth > 0 => {
                self.credit_depth -= 1;
                return;
            }
            "notes" if self.notes_depth > 0 => {
                self.notes_depth -= 1;
                return;
            }
            _ => {}
        }

        if let Some(note) = self.note.as_mut() {
            if note.heading_depth == Some(depth) {
                note.heading_depth = None;
            } else if tag == "p" {
                note.flush();
            } else if note.depth == depth {
                if let Some(mut note) = self.note.take() {
                    note.flush();
                    self.file_note(note);
                }
            }
            return;
        }

        if self.credit_depth == 0 && self.notes_depth == 0 {
            if is_level_tag(tag) || is_text_container(tag) {
                self.flush_paragraph();
            } else if tag == "num" || tag == "heading" {
                self.current.push(' ');
            }
        }
    }

    fn file_note(&mut self, note: NoteBuilder) {
        let heading = collapse_text(&note.heading);
        let body = note.paragraphs.join("\n\n");

        if note.topic == "amendments" || heading.contains("amendments") {
            // A heading-only amendments note stands in as its own body.
            let entry = if body.is_empty() { heading } else { body };
            if !entry.is_empty() {
                self.history.push(entry);
            }
            return;
        }

        if note.role.contains("crossHeading")
            || heading.contains("Editorial")
            || heading.contains("Statutory")
        {
            return;
        }

        let formatted = match (heading.is_empty(), body.is_empty()) {
            (true, true) => return,
            (false, true) => heading,
            (true, false) => body,
            (false, false) => format!("{heading}\n{body}"),
        };
        self.citations.push(formatted);
    }

    fn finish(
        mut self,
        title_id: Option<&str>,
        chapter_id: Option<&str>,
        source_file: &str,
    ) -> Option<Section> {
        self.flush_paragraph();

        let num = collapse_text(&self.num);
        let heading = collapse_text(&self.heading);
        let identifier = self.identifier.as_deref().map(UscIdentifier::parse);

        let section_number = identifier
            .as_ref()
            .and_then(|identifier| identifier.section.clone())
            .or_else(|| number_from_num_text(&num))?;
        let title_id = identifier
            .as_ref()
            .and_then(|identifier| identifier.title.clone())
            .or_else(|| title_id.map(ToString::to_string));
        let section_id = self.identifier.clone().unwrap_or_else(|| match &title_id {
            Some(title) => format!("/us/usc/t{title}/s{section_number}"),
            None => format!("/us/usc/s{section_number}"),
        });

        let label = Some(collapse_text(format!("{num} {heading}")))
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| section_id.clone());
        let mut section = Section::new(section_id, label);
        section.title_id = title_id;
        section.chapter_id = chapter_id.map(ToString::to_string);
        section.section_title = Some(heading).filter(|heading| !heading.is_empty());
        section.range_start = Some(section_number.clone());
        section.range_end = Some(section_number.clone());
        section.section_number = Some(section_number);
        section.blocks.body = self.paragraphs.join("\n\n");
        section.blocks.history_short = collapse_text(&self.credit);
        section.blocks.history_long = normalize_paragraphs(&self.history.join("\n"));
        section.blocks.citations = self.citations.join("\n\n");
        section.source_file = source_file.to_string();
        Some(section)
    }
}

/// Designator from a `<num>` caption such as `"§ 1983."`.
fn number_from_num_text(num: &str) -> Option<String> {
    let token = num
        .trim_start_matches('§')
        .split_whitespace()
        .next()?
        .trim_end_matches('.');
    Some(clean_designator(token)).filter(|value| !value.is_empty())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name.as_bytes())
        .map(|attr| String::from_utf8_lossy(attr.value.as_ref()).to_string())
}

#[derive(Debug, Default)]
struct ChapterContext {
    chapter_id: Option<String>,
    depth: usize,
    heading_depth: Option<usize>,
    heading: String,
}

/// Text capture for the title name: `<meta><dc:title>` or `<main><title><heading>`.
#[derive(Debug, Default)]
struct TitleNameCapture {
    meta_depth: Option<usize>,
    meta_title: String,
    heading_depth: Option<usize>,
    heading: String,
}

struct Walker<'a> {
    source_file: &'a str,
    fallback_title: Option<String>,
    stack: Vec<String>,
    document: UscDocument,
    chapter: ChapterContext,
    title_name: TitleNameCapture,
    section: Option<SectionBuilder>,
}

impl<'a> Walker<'a> {
    fn new(source_file: &'a str, fallback_title: Option<String>) -> Self {
        Self {
            source_file,
            fallback_title,
            stack: Vec::new(),
            document: UscDocument::default(),
            chapter: ChapterContext::default(),
            title_name: TitleNameCapture::default(),
            section: None,
        }
    }

    fn inside(&self, tag: &str) -> bool {
        self.stack.iter().any(|open| open == tag)
    }

    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    fn grandparent(&self) -> Option<&str> {
        let len = self.stack.len();
        len.checked_sub(2)
            .and_then(|idx| self.stack.get(idx))
            .map(String::as_str)
    }

    fn title_id(&self) -> Option<&str> {
        self.document
            .title_id
            .as_deref()
            .or(self.fallback_title.as_deref())
    }

    fn open(&mut self, tag: String, element: &BytesStart<'_>) {
        let depth = self.stack.len() + 1;

        if let Some(section) = self.section.as_mut() {
            section.open(&tag, depth, element);
            self.stack.push(tag);
            return;
        }

        let in_excluded = self.inside("note") || self.inside("quotedContent");

        if self.document.title_id.is_none() {
            if let Some(title) = attribute(element, "identifier")
                .and_then(|identifier| UscIdentifier::parse(&identifier).title)
            {
                self.document.title_id = Some(title);
            }
        }

        match tag.as_str() {
            "title" if self.parent() == Some("meta") => {
                self.title_name.meta_depth = Some(depth);
            }
            "heading" if self.parent() == Some("title") && self.grandparent() == Some("main") => {
                if self.title_name.heading.is_empty() {
                    self.title_name.heading_depth = Some(depth);
                }
            }
            "heading"
                if self.chapter.depth + 1 == depth
                    && self.chapter.heading.is_empty()
                    && self.parent() == Some("chapter") =>
            {
                self.chapter.heading_depth = Some(depth);
            }
            "chapter" if !in_excluded => self.open_chapter(depth, element),
            "section" if !in_excluded => {
                self.section = Some(SectionBuilder {
                    depth,
                    identifier: attribute(element, "identifier"),
                    ..SectionBuilder::default()
                });
            }
            _ => {}
        }

        self.stack.push(tag);
    }

    fn open_chapter(&mut self, depth: usize, element: &BytesStart<'_>) {
        let mut identifier = attribute(element, "identifier")
            .map(|identifier| UscIdentifier::parse(&identifier))
            .unwrap_or_default();
        if identifier.title.is_none() {
            identifier.title = self.title_id().map(ToString::to_string);
        }
        let (Some(chapter_number), Some(chapter_id)) =
            (identifier.chapter.clone(), identifier.chapter_id())
        else {
            return;
        };

        self.chapter = ChapterContext {
            chapter_id: Some(chapter_id.clone()),
            depth,
            heading_depth: None,
            heading: String::new(),
        };
        self.document.chapters.push(ChapterInfo {
            chapter_id,
            chapter_number,
            chapter_title: None,
        });
    }

    fn close(&mut self) {
        let depth = self.stack.len();
        let Some(tag) = self.stack.pop() else {
            return;
        };

        if let Some(section) = self.section.as_mut() {
            if section.depth != depth {
                section.close(&tag, depth);
                return;
            }
            if let Some(section) = self.section.take() {
                let chapter_id = self.chapter.chapter_id.clone();
                let title_id = self.title_id().map(ToString::to_string);
                if let Some(section) =
                    section.finish(title_id.as_deref(), chapter_id.as_deref(), self.source_file)
                {
                    self.document.sections.push(section);
                }
            }
            return;
        }

        if self.title_name.meta_depth == Some(depth) {
            self.title_name.meta_depth = None;
        }
        if self.title_name.heading_depth == Some(depth) {
            self.title_name.heading_depth = None;
        }
        if self.chapter.heading_depth == Some(depth) {
            self.chapter.heading_depth = None;
            let heading = collapse_text(&self.chapter.heading);
            if let Some(chapter) = self.document.chapters.last_mut() {
                chapter.chapter_title = Some(heading).filter(|heading| !heading.is_empty());
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(section) = self.section.as_mut() {
            section.text(text);
        } else if self.title_name.meta_depth.is_some() {
            self.title_name.meta_title.push_str(text);
        } else if self.title_name.heading_depth.is_some() {
            self.title_name.heading.push_str(text);
        } else if self.chapter.heading_depth.is_some() {
            self.chapter.heading.push_str(text);
        }
    }

    fn finish(mut self) -> UscDocument {
        if self.document.title_id.is_none() {
            self.document.title_id = self.fallback_title.take();
        }
        let meta_title = collapse_text(&self.title_name.meta_title);
        let heading = collapse_text(&self.title_name.heading);
        self.document.title_name = [meta_title, heading]
            .into_iter()
            .find(|name| !name.is_empty())
            .or_else(|| {
                self.document
                    .title_id
                    .as_ref()
                    .map(|title| format!("Title {title}"))
            });
        self.document
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).to_string()
}

/// Walks one USLM document. A read error ends the walk: sections completed
/// before it are kept and a `MalformedDocument` warning is recorded.
pub fn parse_usc_document(
    xml: &str,
    source_file: &str,
    fallback_title: Option<String>,
) -> UscDocument {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut walker = Walker::new(source_file, fallback_title);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => walker.open(local_name(e), e),
            Ok(Event::Empty(ref e)) => {
                walker.open(local_name(e), e);
                walker.close();
            }
            Ok(Event::End(_)) => walker.close(),
            Ok(Event::Text(ref e)) => match e.unescape() {
                Ok(text) => walker.text(&text),
                Err(_) => walker.text(&String::from_utf8_lossy(e)),
            },
            Ok(Event::CData(ref e)) => walker.text(&String::from_utf8_lossy(e)),
            Ok(Event::Eof) => break,
            Err(err) => {
                let message = format!("{err} at byte {}", reader.buffer_position());
                tracing::warn!("[Ingest] Stopping USLM walk of {}: {}", source_file, message);
                walker.document.warnings.push(ExtractWarning::MalformedDocument {
                    path: source_file.to_string(),
                    message,
                });
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    walker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_caption_yields_designator() {
        assert_eq!(number_from_num_text("§ 0106a.").as_deref(), Some("106a"));
        assert_eq!(number_from_num_text("").as_deref(), None);
    }
}
