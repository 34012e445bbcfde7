//! Pass 1: Footnote linking
//!
//! Exported footnotes come in two parts: reference anchors in the running
//! text (`<a class="footnote">3</a>`) and one `<p class="footnote">` per
//! note at the end. This pass turns the references into superscript links
//! and the note paragraphs into a single list the references point at.

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::Result;

/// Classes marking a footnote reference anchor.
const REFERENCE_CLASSES: &[&str] = &["footnote", "footnote-num"];
/// Class marking a footnote paragraph.
const NOTE_CLASS: &str = "footnote";
/// Classes of the number/bullet marker inside a note paragraph.
const MARKER_CLASSES: &[&str] = &["footnotelist-num", "Subformate_Fu-notenzahl"];
/// Marker texts of bulleted (unnumbered) notes.
const BULLETS: &[&str] = &["•", "·", "○", "◦", "▪", "▫", "►"];

/// What the pass changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FootnoteStats {
    /// Reference anchors rewritten.
    pub references: usize,
    /// Note paragraphs folded into the list (0 when no list was built).
    pub notes: usize,
}

/// Link footnote references and collect note paragraphs into a list.
pub fn process_footnotes(dom: &mut ArenaDom, root: ArenaNodeId) -> Result<FootnoteStats> {
    let references = link_references(dom, root);
    let notes = build_note_list(dom, root)?;
    Ok(FootnoteStats { references, notes })
}

fn link_references(dom: &mut ArenaDom, root: ArenaNodeId) -> usize {
    let anchors: Vec<_> = dom
        .elements_by_tag(root, "a")
        .into_iter()
        .filter(|&id| REFERENCE_CLASSES.iter().any(|c| dom.has_class(id, c)))
        .collect();

    let mut linked = 0;
    for anchor in anchors {
        let text = dom.text_content(anchor);
        let Some(number) = trailing_digits(text.trim()) else {
            continue;
        };
        let number = number.to_string();

        dom.set_attr(anchor, "href", &format!("#footnote-{number}"));
        dom.set_attr(anchor, "id", &format!("footnum-{number}"));
        dom.clear_children(anchor);
        let sup = dom.create_html_element("sup", &[("class", "footnote")]);
        dom.append_text(sup, &number);
        dom.append(anchor, sup);
        linked += 1;
    }
    linked
}

/// The last run of ASCII digits in `text`.
fn trailing_digits(text: &str) -> Option<&str> {
    let end = text.rfind(|c: char| c.is_ascii_digit())? + 1;
    let start = text[..end]
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .len();
    Some(&text[start..end])
}

/// Leading `\d+[).]?\s*` of `text`: the number and the byte length to strip.
fn leading_number(text: &str) -> Option<(&str, usize)> {
    let digits = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    if digits == 0 {
        return None;
    }
    let mut end = digits;
    if text[end..].starts_with([')', '.']) {
        end += 1;
    }
    let rest = &text[end..];
    end += rest.len() - rest.trim_start().len();
    Some((&text[..digits], end))
}

fn is_marker(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    MARKER_CLASSES.iter().any(|c| dom.has_class(id, c))
}

/// Bulleted notes: the first marker is a bullet glyph or has no digit.
fn notes_are_unnumbered(dom: &ArenaDom, notes: &[ArenaNodeId]) -> bool {
    let first_marker = notes
        .iter()
        .find_map(|&p| dom.elements_with_class(p, MARKER_CLASSES[0]).first().copied());
    match first_marker {
        Some(marker) => {
            let text = dom.text_content(marker);
            let text = text.trim();
            BULLETS.contains(&text) || !text.chars().any(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn build_note_list(dom: &mut ArenaDom, root: ArenaNodeId) -> Result<usize> {
    let notes: Vec<_> = dom
        .elements_by_tag(root, "p")
        .into_iter()
        .filter(|&id| dom.has_class(id, NOTE_CLASS))
        .collect();
    // A lone note paragraph is left as it is.
    if notes.len() < 2 {
        return Ok(0);
    }

    let unnumbered = notes_are_unnumbered(dom, &notes);
    let list = dom.create_html_element(if unnumbered { "ul" } else { "ol" }, &[("class", "footnotes")]);

    for (index, &note) in notes.iter().enumerate() {
        let item = if unnumbered {
            Some(bulleted_item(dom, note, index + 1))
        } else {
            numbered_item(dom, note)
        };
        if let Some(item) = item {
            dom.append(list, item);
        }
    }

    dom.replace(notes[0], list)?;
    for &note in &notes[1..] {
        dom.detach(note);
    }
    Ok(notes.len())
}

fn bulleted_item(dom: &mut ArenaDom, note: ArenaNodeId, index: usize) -> ArenaNodeId {
    let markers: Vec<_> = dom
        .descendants(note)
        .into_iter()
        .filter(|&id| is_marker(dom, id))
        .collect();
    for marker in markers {
        dom.detach(marker);
    }

    let item = dom.create_html_element("li", &[("id", &format!("footnote-{index}"))]);
    dom.move_children(note, item);
    item
}

fn numbered_item(dom: &mut ArenaDom, note: ArenaNodeId) -> Option<ArenaNodeId> {
    let text = dom.text_content(note);
    let number = leading_number(text.trim())?.0.to_string();

    let item = dom.create_html_element("li", &[("id", &format!("footnote-{number}"))]);
    let link = dom.create_html_element("a", &[("href", &format!("#footnum-{number}"))]);
    dom.append(item, link);

    let mut first_text_seen = false;
    let children: Vec<_> = dom.children(note).collect();
    for child in children {
        if let Some(text) = dom.text(child)
            && !first_text_seen
        {
            first_text_seen = true;
            let cleaned = match leading_number(text) {
                Some((_, strip)) => text[strip..].to_string(),
                None => text.to_string(),
            };
            if !cleaned.trim().is_empty() {
                let node = dom.create_text(cleaned);
                dom.append(link, node);
            }
        } else if dom.is_element(child) && is_marker(dom, child) {
            continue;
        } else {
            dom.append(link, child);
        }
    }
    Some(item)
}
