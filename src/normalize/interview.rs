//! Pass 2: List-to-blockquote conversion
//!
//! Interviews arrive as bulleted lists, one bullet per question or answer.
//! The page layout wants each of them as a standalone quote.

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::Result;

/// Turn every `<ul>` item into `<blockquote><p>…</p></blockquote>` and
/// unwrap the list, so the quotes become siblings of the surrounding blocks.
///
/// Returns the number of lists converted.
pub fn lists_to_blockquotes(dom: &mut ArenaDom, root: ArenaNodeId) -> Result<usize> {
    let lists = dom.elements_by_tag(root, "ul");

    for &list in &lists {
        let items: Vec<_> = dom
            .element_children(list)
            .into_iter()
            .filter(|&id| dom.tag_is(id, "li"))
            .collect();

        for item in items {
            let quote = dom.create_html_element("blockquote", &[]);
            let para = dom.create_html_element("p", &[]);
            dom.append(quote, para);
            dom.move_children(item, para);
            dom.replace(item, quote)?;
        }
        dom.unwrap(list)?;
    }
    Ok(lists.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;

    fn run(html: &str) -> String {
        let mut fragment = parse_fragment(html);
        lists_to_blockquotes(&mut fragment.dom, fragment.body).unwrap();
        fragment.inner_html()
    }

    #[test]
    fn test_items_become_quotes() {
        assert_eq!(
            run("<p>Intro</p><ul><li><strong>Q:</strong> Why?</li><li>Because.</li></ul>"),
            "<p>Intro</p>\
             <blockquote><p><strong>Q:</strong> Why?</p></blockquote>\
             <blockquote><p>Because.</p></blockquote>"
        );
    }

    #[test]
    fn test_ordered_lists_untouched() {
        let html = "<ol><li>one</li></ol>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_whitespace_between_items_is_promoted() {
        assert_eq!(
            run("<ul>\n<li>a</li>\n</ul>"),
            "\n<blockquote><p>a</p></blockquote>\n"
        );
    }

    #[test]
    fn test_nested_list_inside_item() {
        assert_eq!(
            run("<ul><li>a<ul><li>b</li></ul></li></ul>"),
            "<blockquote><p>a<blockquote><p>b</p></blockquote></p></blockquote>"
        );
    }
}
