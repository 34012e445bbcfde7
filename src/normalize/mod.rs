//! HTML normalization passes.
//!
//! Each pass mutates the module body in place and is switched on by its own
//! setting. Passes are independent of each other, but always run in this
//! order so the splitter sees a fully normalized tree:
//!
//! 1. **Footnotes** - Link references, collect notes into a list
//! 2. **Interview lists** - Bulleted items become blockquotes
//! 3. **Link icons** - Drop icon-glyph spans in front of links
//! 4. **Empty spans** - Unwrap attribute-less spans
//! 5. **Tag merging** - Coalesce fragmented `em`/`span` runs

mod empty_spans;
mod footnotes;
mod interview;
mod link_icons;
mod merge;

pub use empty_spans::remove_empty_spans;
pub use footnotes::{FootnoteStats, process_footnotes};
pub use interview::lists_to_blockquotes;
pub use link_icons::{LINK_ICON_CLASS, fix_link_icons};
pub use merge::merge_fragmented_tags;

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::Result;
use crate::log_sink::LogSink;
use crate::settings::Settings;

/// Run every enabled pass on the subtree under `root`.
pub fn normalize(
    dom: &mut ArenaDom,
    root: ArenaNodeId,
    settings: &Settings,
    log: &mut dyn LogSink,
) -> Result<()> {
    if settings.process_footnotes {
        let stats = process_footnotes(dom, root)?;
        if stats.references > 0 {
            log.log(&format!("Linked {} footnote reference(s)", stats.references));
        }
        if stats.notes > 0 {
            log.log(&format!("Collected {} footnote(s) into a list", stats.notes));
        }
    }
    if settings.process_interview_lists {
        let n = lists_to_blockquotes(dom, root)?;
        if n > 0 {
            log.log(&format!("Converted {n} list(s) into blockquotes"));
        }
    }
    if settings.fix_link_icons {
        let n = fix_link_icons(dom, root)?;
        if n > 0 {
            log.log(&format!("Removed {n} link icon(s)"));
        }
    }
    if settings.remove_empty_spans {
        let n = remove_empty_spans(dom, root)?;
        log::debug!("removed {n} empty span(s)");
    }
    if settings.process_tag_merging {
        let n = merge_fragmented_tags(dom, root)?;
        log::debug!("merged {n} fragmented tag(s)");
    }
    Ok(())
}
