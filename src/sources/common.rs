use crate::types::{BlockKind, ContentBlock};

/// Push a content block if the value is non-empty.
pub fn push_block(blocks: &mut Vec<ContentBlock>, kind: BlockKind, label: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    blocks.push(ContentBlock {
        kind,
        label: Some(label.to_string()),
        content: value.to_string(),
    });
}

/// The body block is always present, even when empty.
pub fn body_block(text: &str) -> ContentBlock {
    ContentBlock {
        kind: BlockKind::Body,
        label: None,
        content: text.to_string(),
    }
}

/// Path-safe form of a designator: whitespace runs become `_`.
pub fn slug_segment(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("_")
}
