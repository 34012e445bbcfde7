//! Pass 3: Link-icon fix

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::Result;

/// Icon-font glyphs the export puts in front of links.
const ICON_GLYPHS: &[char] = &['\u{f0da}', '\u{f105}', '\u{203a}'];

/// Class added to a link that had an icon span in front of it.
pub const LINK_ICON_CLASS: &str = "link-icon";

/// Replace icon-glyph spans in front of links with a class on the link.
///
/// ```html
/// <span>&#xf0da;</span><a href="/x">More</a>
/// ```
///
/// becomes `<a href="/x" class="link-icon">More</a>`, letting the theme
/// draw the arrow instead.
///
/// Returns the number of links fixed.
pub fn fix_link_icons(dom: &mut ArenaDom, root: ArenaNodeId) -> Result<usize> {
    let mut fixed = 0;
    for link in dom.elements_by_tag(root, "a") {
        let Some(prev) = dom.prev_sibling(link) else {
            continue;
        };
        if !dom.tag_is(prev, "span") || !is_icon_text(&dom.text_content(prev)) {
            continue;
        }
        dom.add_class(link, LINK_ICON_CLASS);
        dom.detach(prev);
        fixed += 1;
    }
    Ok(fixed)
}

/// Exactly one icon glyph, optionally padded with whitespace (NBSP included).
fn is_icon_text(text: &str) -> bool {
    let mut chars = text.trim().chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if ICON_GLYPHS.contains(&c))
}
