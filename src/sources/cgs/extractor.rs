//! Block extraction for catch-line delimited statute markup.
//!
//! [`BlockExtractor`] is a state machine fed with open/close/text events. It
//! keeps a current target block and a stack of `(tag, previous target)` scopes,
//! so nesting depth is bounded only by the markup and a malformed close tag
//! can never corrupt the state of a sibling scope. [`extract_fragment`] drives
//! it from a lenient `tl` parse using an explicit work stack.

use crate::text::{collapse_text, decode_entities, normalize_block};
use crate::types::{BlockKind, TextBlocks};
use regex::Regex;
use std::sync::LazyLock;
use tl::NodeHandle;

// Raw-text elements are cut before parsing; an unterminated one runs to the end.
static RAW_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?(?:</script\s*>|\z)|<style\b.*?(?:</style\s*>|\z)").unwrap()
});

const LABEL_CLASS: &str = "catchln";
const NAV_TABLE_CLASS: &str = "nav_tbl";
const CELL_SEPARATOR: &str = " | ";

/// Whitespace-separated `class` attribute tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassList<'a>(Option<&'a str>);

impl<'a> ClassList<'a> {
    pub fn new(value: Option<&'a str>) -> Self {
        Self(value)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0
            .is_some_and(|value| value.split_whitespace().any(|token| token == class))
    }

    fn contains_any(&self, classes: &[&str]) -> bool {
        classes.iter().any(|class| self.contains(class))
    }
}

fn classify_target(classes: &ClassList<'_>) -> Option<BlockKind> {
    if classes.contains_any(&["source", "source-first"]) {
        return Some(BlockKind::HistoryShort);
    }
    if classes.contains_any(&["history", "history-first"]) {
        return Some(BlockKind::HistoryLong);
    }
    if classes.contains_any(&["annotation", "annotation-first"]) {
        return Some(BlockKind::Citations);
    }
    if classes.contains_any(&["cross-ref", "cross-ref-first"]) {
        return Some(BlockKind::SeeAlso);
    }
    None
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div" | "table" | "tr" | "ul" | "ol" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

/// Result of running one fragment through the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFragment {
    /// Catch-line text, captured apart from every block.
    pub label: Option<String>,
    pub blocks: TextBlocks,
}

#[derive(Debug, Clone)]
pub struct BlockExtractor {
    buffers: TextBlocks,
    target: BlockKind,
    scopes: Vec<(String, BlockKind)>,
    script_depth: usize,
    style_depth: usize,
    label_depth: usize,
    label: Option<String>,
    nav_depth: usize,
    stopped: bool,
    in_row: bool,
    row_cells: usize,
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockExtractor {
    pub fn new() -> Self {
        Self {
            buffers: TextBlocks::default(),
            target: BlockKind::Body,
            scopes: Vec::new(),
            script_depth: 0,
            style_depth: 0,
            label_depth: 0,
            label: None,
            nav_depth: 0,
            stopped: false,
            in_row: false,
            row_cells: 0,
        }
    }

    pub fn current_target(&self) -> BlockKind {
        self.target
    }

    fn newline(&mut self) {
        let buffer = self.buffers.get_mut(self.target);
        if !buffer.is_empty() && !buffer.ends_with('\n') {
            buffer.push('\n');
        }
    }

    pub fn open(&mut self, tag: &str, classes: ClassList<'_>) {
        if self.stopped {
            return;
        }
        if self.nav_depth > 0 {
            if tag == "table" {
                self.nav_depth += 1;
            }
            return;
        }

        match tag {
            "script" => {
                self.script_depth += 1;
                return;
            }
            "style" => {
                self.style_depth += 1;
                return;
            }
            _ => {}
        }
        if self.script_depth > 0 || self.style_depth > 0 {
            return;
        }

        if self.label_depth > 0 {
            if tag == "span" {
                self.label_depth += 1;
            }
            return;
        }

        if tag == "span" && classes.contains(LABEL_CLASS) {
            self.label_depth = 1;
            self.label.get_or_insert_with(String::new);
            return;
        }

        if tag == "table" && classes.contains(NAV_TABLE_CLASS) {
            self.nav_depth = 1;
            return;
        }

        if tag == "br" || tag == "hr" {
            self.newline();
            return;
        }

        if let Some(target) = classify_target(&classes) {
            if target != self.target {
                self.scopes.push((tag.to_string(), self.target));
                self.target = target;
            }
        }

        if tag == "tr" {
            self.in_row = true;
            self.row_cells = 0;
        }

        if (tag == "td" || tag == "th") && self.in_row {
            if self.row_cells > 0 {
                self.buffers.get_mut(self.target).push_str(CELL_SEPARATOR);
            }
            self.row_cells += 1;
        }

        if is_block_tag(tag) {
            self.newline();
        }
    }

    pub fn close(&mut self, tag: &str) {
        if self.stopped {
            return;
        }
        if self.nav_depth > 0 {
            if tag == "table" {
                self.nav_depth -= 1;
                if self.nav_depth == 0 {
                    // Everything after the navigation table is page boilerplate.
                    self.stopped = true;
                }
            }
            return;
        }

        match tag {
            "script" => {
                self.script_depth = self.script_depth.saturating_sub(1);
                return;
            }
            "style" => {
                self.style_depth = self.style_depth.saturating_sub(1);
                return;
            }
            _ => {}
        }
        if self.script_depth > 0 || self.style_depth > 0 {
            return;
        }

        if self.label_depth > 0 {
            if tag == "span" {
                self.label_depth -= 1;
            }
            return;
        }

        if tag == "tr" {
            self.in_row = false;
            self.newline();
            return;
        }

        if self.scopes.last().is_some_and(|(open_tag, _)| open_tag == tag) {
            if let Some((_, previous)) = self.scopes.pop() {
                self.target = previous;
            }
        }

        if is_block_tag(tag) {
            self.newline();
        }
    }

    pub fn text(&mut self, text: &str) {
        if self.stopped || self.nav_depth > 0 || self.script_depth > 0 || self.style_depth > 0 {
            return;
        }

        let decoded = decode_entities(text);
        if self.label_depth > 0 {
            if let Some(label) = self.label.as_mut() {
                label.push_str(&decoded);
            }
            return;
        }

        self.buffers.get_mut(self.target).push_str(&decoded);
    }

    pub fn finish(self) -> ExtractedFragment {
        let blocks = TextBlocks {
            body: normalize_block(&self.buffers.body),
            history_short: normalize_block(&self.buffers.history_short),
            history_long: normalize_block(&self.buffers.history_long),
            citations: normalize_block(&self.buffers.citations),
            see_also: normalize_block(&self.buffers.see_also),
        };
        let label = self.label.map(collapse_text).filter(|label| !label.is_empty());

        ExtractedFragment { label, blocks }
    }
}

enum Step {
    Enter(NodeHandle),
    Leave(String),
}

/// Parses one markup fragment and feeds its events through a fresh extractor.
pub fn extract_fragment(markup: &str) -> ExtractedFragment {
    let mut extractor = BlockExtractor::new();

    let markup = RAW_TEXT_RE.replace_all(markup, "");
    let dom = match tl::parse(&markup, tl::ParserOptions::default()) {
        Ok(dom) => dom,
        Err(err) => {
            tracing::warn!("[Ingest] Markup fragment could not be parsed: {:?}", err);
            return extractor.finish();
        }
    };
    let parser = dom.parser();

    let mut work = dom
        .children()
        .iter()
        .rev()
        .map(|handle| Step::Enter(*handle))
        .collect::<Vec<_>>();

    while let Some(step) = work.pop() {
        let handle = match step {
            Step::Leave(tag) => {
                extractor.close(&tag);
                continue;
            }
            Step::Enter(handle) => handle,
        };

        let Some(node) = handle.get(parser) else {
            continue;
        };

        if let Some(raw) = node.as_raw() {
            extractor.text(raw.as_utf8_str().as_ref());
            continue;
        }

        let Some(tag) = node.as_tag() else {
            continue;
        };
        let name = tag.name().as_utf8_str().to_ascii_lowercase();
        let class_value = tag.attributes().class().map(|class| class.as_utf8_str());
        extractor.open(&name, ClassList::new(class_value.as_deref()));

        work.push(Step::Leave(name));
        let children = tag.children().top().iter().copied().collect::<Vec<_>>();
        for child in children.into_iter().rev() {
            work.push(Step::Enter(child));
        }
    }

    extractor.finish()
}
