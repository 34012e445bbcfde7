//! Pass 4: Empty-span removal

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::Result;

/// Unwrap every `<span>` that carries no attributes at all.
///
/// Word-processor exports leave bare spans behind wherever a style run was
/// stripped. They do nothing but fragment the text. Spans with any
/// attribute (class, style, lang, ...) are kept.
///
/// Returns the number of spans removed.
pub fn remove_empty_spans(dom: &mut ArenaDom, root: ArenaNodeId) -> Result<usize> {
    let spans: Vec<_> = dom
        .elements_by_tag(root, "span")
        .into_iter()
        .filter(|&id| dom.attrs(id).is_empty())
        .collect();

    for &span in &spans {
        dom.unwrap(span)?;
    }
    Ok(spans.len())
}
