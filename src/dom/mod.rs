//! Owned HTML tree for text module bodies.
//!
//! Module HTML is parsed by html5ever into an [`ArenaDom`], rewritten in
//! place by the normalization passes, and serialized back with
//! [`inner_html`] / [`outer_html`].

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, html_name};
pub use serialize::{SerializableNode, inner_html, outer_html};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// A parsed HTML fragment: the whole document plus its `<body>`.
pub struct Fragment {
    pub dom: ArenaDom,
    pub body: ArenaNodeId,
}

impl Fragment {
    /// Serialized content of the body.
    pub fn inner_html(&self) -> String {
        inner_html(&self.dom, self.body)
    }
}

/// Parse a fragment of HTML (not a full document).
///
/// The fragment is wrapped in a minimal document so it ends up in `<body>`
/// exactly like browser `DOMParser` output for the same string.
pub fn parse_fragment(html: &str) -> Fragment {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let sink = ArenaSink::new();
    let dom = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes())
        .into_dom();

    // The tree builder always creates a body for an html document.
    let body = dom.find_by_tag("body").unwrap_or_else(|| dom.document());
    Fragment { dom, body }
}
