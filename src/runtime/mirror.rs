use crate::runtime::types::DocumentSource;
use crate::types::SourceDocument;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A local directory holding an already-fetched copy of a source.
pub struct MirrorSource {
    root: PathBuf,
}

impl MirrorSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    Some(parts.join("/"))
}

#[async_trait]
impl DocumentSource for MirrorSource {
    /// Every regular file under the root, as sorted `/`-separated relative paths.
    async fn list_documents(&self) -> Result<Vec<String>, String> {
        let mut pending = vec![self.root.clone()];
        let mut paths = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| format!("Failed to read directory {}: {e}", dir.display()))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| format!("Failed to read entry in {}: {e}", dir.display()))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| format!("Failed to stat {}: {e}", entry.path().display()))?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if let Some(relative) = relative_path(&self.root, &path) {
                        paths.push(relative);
                    }
                }
            }
        }

        paths.sort();
        Ok(paths)
    }

    async fn read_document(&self, path: &str) -> Result<SourceDocument, String> {
        let full_path = self.root.join(path);
        let bytes = tokio::fs::read(&full_path)
            .await
            .map_err(|e| format!("Failed to read {}: {e}", full_path.display()))?;
        Ok(SourceDocument::new(
            path,
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }
}

/// Reads every listed document, in listing order.
pub async fn read_documents(source: &dyn DocumentSource) -> Result<Vec<SourceDocument>, String> {
    let paths = source.list_documents().await?;
    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        documents.push(source.read_document(path).await?);
    }
    Ok(documents)
}
