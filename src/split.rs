//! Splitting a module body into chunks at structural boundaries.

use crate::dom::{ArenaDom, ArenaNodeId, outer_html, parse_fragment};

/// A contiguous run of top-level nodes that becomes one output module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub html: String,
    /// Number of top-level `<p>` elements in the chunk.
    pub paragraph_count: usize,
}

/// Split module HTML at trigger elements and paragraph budgets.
///
/// * `triggers` - tag names that start a new chunk (`h2`, `blockquote`, ...)
/// * `paragraph_budget` - close a chunk once it holds this many paragraphs
///
/// With no triggers and no budget, or when the HTML has no element at the
/// top level, the input comes back untouched as a single chunk.
///
/// Top-level text stays with the chunk it appears in, so the chunks
/// concatenate back to the serialized input. Whitespace-only text never
/// opens a chunk by itself.
pub fn split_html(html: &str, triggers: &[&str], paragraph_budget: Option<usize>) -> Vec<Chunk> {
    let fragment = parse_fragment(html);
    let (dom, body) = (&fragment.dom, fragment.body);

    let has_elements = dom.children(body).any(|id| dom.is_element(id));
    if !has_elements || (triggers.is_empty() && paragraph_budget.is_none()) {
        return vec![Chunk {
            html: html.to_string(),
            paragraph_count: dom.elements_by_tag(body, "p").len(),
        }];
    }

    let mut splitter = Splitter {
        chunks: Vec::new(),
        buffer: String::new(),
        has_content: false,
        paragraphs: 0,
    };

    for id in dom.children(body) {
        splitter.push(dom, id, triggers, paragraph_budget);
    }
    splitter.finish()
}

struct Splitter {
    chunks: Vec<Chunk>,
    buffer: String,
    /// The buffer holds more than whitespace.
    has_content: bool,
    paragraphs: usize,
}

impl Splitter {
    fn push(
        &mut self,
        dom: &ArenaDom,
        id: ArenaNodeId,
        triggers: &[&str],
        paragraph_budget: Option<usize>,
    ) {
        let Some(tag) = dom.element_name(id).map(|n| &**n) else {
            // Text and comments ride along with whatever comes next.
            if dom.text(id).is_some_and(|t| !t.trim().is_empty()) {
                self.has_content = true;
            }
            self.buffer.push_str(&outer_html(dom, id));
            return;
        };

        if triggers.contains(&tag) && self.has_content {
            self.close();
        }

        self.buffer.push_str(&outer_html(dom, id));
        self.has_content = true;
        if tag == "p" {
            self.paragraphs += 1;
        }

        if paragraph_budget.is_some_and(|max| self.paragraphs >= max) {
            self.close();
        }
    }

    fn close(&mut self) {
        self.chunks.push(Chunk {
            html: std::mem::take(&mut self.buffer),
            paragraph_count: self.paragraphs,
        });
        self.has_content = false;
        self.paragraphs = 0;
    }

    fn finish(mut self) -> Vec<Chunk> {
        if self.has_content {
            self.close();
        } else if !self.buffer.is_empty() {
            // Trailing whitespace belongs to the last chunk.
            match self.chunks.last_mut() {
                Some(last) => last.html.push_str(&self.buffer),
                None => self.close(),
            }
        }
        self.chunks
    }
}
