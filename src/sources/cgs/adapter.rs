use crate::designator::normalize_designator;
use crate::sources::cgs::parser::{
    chapter_number_from_stem, extract_chapter_title, extract_title_name, parse_fragment,
    split_sections, title_id_from_stem,
};
use crate::sources::{ChapterInfo, DocumentExtract, SourceAdapter, TitleInfo};
use crate::types::{SourceDocument, SourceKind};

pub struct CgsAdapter;

pub const CGS_ADAPTER: CgsAdapter = CgsAdapter;

impl SourceAdapter for CgsAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Cgs
    }

    fn accepts(&self, path: &str) -> bool {
        let lower = path.to_ascii_lowercase();
        lower.ends_with(".htm") || lower.ends_with(".html")
    }

    fn extract(&self, document: &SourceDocument) -> DocumentExtract {
        let stem = document.file_stem();
        let mut extract = DocumentExtract::default();

        // Title pages list chapters only; they contribute the title name.
        if let Some(title_id) = title_id_from_stem(stem) {
            extract.titles.push(TitleInfo {
                title_id: normalize_designator(title_id),
                title_name: extract_title_name(&document.markup),
            });
            return extract;
        }

        let fragments = split_sections(&document.markup);
        if fragments.is_empty() {
            return extract;
        }

        extract.chapters.push(ChapterInfo {
            chapter_id: stem.to_string(),
            chapter_number: chapter_number_from_stem(stem).to_string(),
            chapter_title: extract_chapter_title(&document.markup),
        });

        for fragment in &fragments {
            let section = parse_fragment(fragment, stem, &document.path, &mut extract.warnings);
            extract.sections.push(section);
        }

        tracing::debug!(
            "[Ingest] {}: {} sections from {}",
            self.kind().as_str(),
            extract.sections.len(),
            document.path
        );

        extract
    }
}
