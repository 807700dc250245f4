use crate::designator::normalize_designator;
use crate::sources::usc::parser::parse_usc_document;
use crate::sources::{DocumentExtract, SourceAdapter, TitleInfo};
use crate::types::{SourceDocument, SourceKind};

pub struct UscAdapter;

pub const USC_ADAPTER: UscAdapter = UscAdapter;

/// Title designator from a release file name: `usc05A.xml` -> `5a`.
fn title_from_stem(stem: &str) -> Option<String> {
    let lower = stem.to_ascii_lowercase();
    let value = lower.strip_prefix("usc")?;
    Some(normalize_designator(value)).filter(|value| !value.is_empty())
}

impl SourceAdapter for UscAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Usc
    }

    fn accepts(&self, path: &str) -> bool {
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path)
            .to_ascii_lowercase();
        name.starts_with("usc") && name.ends_with(".xml")
    }

    fn extract(&self, document: &SourceDocument) -> DocumentExtract {
        let parsed = parse_usc_document(
            &document.markup,
            &document.path,
            title_from_stem(document.file_stem()),
        );

        let titles = parsed
            .title_id
            .map(|title_id| TitleInfo {
                title_id: normalize_designator(&title_id),
                title_name: parsed.title_name,
            })
            .into_iter()
            .collect();

        tracing::debug!(
            "[Ingest] {}: {} sections, {} chapters from {}",
            self.kind().as_str(),
            parsed.sections.len(),
            parsed.chapters.len(),
            document.path
        );

        DocumentExtract {
            sections: parsed.sections,
            chapters: parsed.chapters,
            titles,
            warnings: parsed.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_release_file_name() {
        assert_eq!(title_from_stem("usc05A").as_deref(), Some("5a"));
        assert_eq!(title_from_stem("usc"), None);
        assert_eq!(title_from_stem("title05"), None);
    }
}
