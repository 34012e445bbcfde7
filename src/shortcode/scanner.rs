//! Forward scanning for shortcode spans.
//!
//! Divi exports are flat strings of bracket tags. Instead of pattern
//! matching over the whole string we walk it with `memmem` finders and track
//! the tag boundaries explicitly.

use std::ops::Range;

use memchr::memmem;

const TEXT_OPEN: &[u8] = b"[et_pb_text";
const TEXT_CLOSE: &[u8] = b"[/et_pb_text]";
const ROW_OPEN: &[u8] = b"[et_pb_row";
const ROW_CLOSE: &[u8] = b"[/et_pb_row]";
const COLUMN_OPEN: &[u8] = b"[et_pb_column";
const COLUMN_CLOSE: &[u8] = b"[/et_pb_column]";
const ROW_INNER_OPEN: &[u8] = b"[et_pb_row_inner";
const ROW_INNER_CLOSE: &[u8] = b"[/et_pb_row_inner]";
const COLUMN_INNER_OPEN: &[u8] = b"[et_pb_column_inner";
const COLUMN_INNER_CLOSE: &[u8] = b"[/et_pb_column_inner]";

/// One `[et_pb_text …]…[/et_pb_text]` span, borrowed from the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextModule<'a> {
    /// Everything between the tag name and the `]` of the opening tag.
    pub attributes: &'a str,
    pub inner_html: &'a str,
    /// Byte range of the whole span, closing tag included.
    pub span: Range<usize>,
}

/// The row and column a module sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrappers<'a> {
    /// Byte offset of the row's opening tag.
    pub start: usize,
    pub row: &'a str,
    pub column: Option<&'a str>,
    /// `[et_pb_row_inner]`/`[et_pb_column_inner]` of a specialty section.
    pub inner: bool,
}

impl Wrappers<'_> {
    pub fn row_tag(&self) -> &'static str {
        if self.inner { "et_pb_row_inner" } else { "et_pb_row" }
    }

    pub fn column_tag(&self) -> &'static str {
        if self.inner { "et_pb_column_inner" } else { "et_pb_column" }
    }
}

/// The tag name at `start` ends right after `name` (so `[et_pb_row` does
/// not match `[et_pb_row_inner`).
fn name_ends(markup: &[u8], start: usize, name: &[u8]) -> bool {
    matches!(
        markup.get(start + name.len()),
        Some(b']') | Some(b' ' | b'\t' | b'\n' | b'\r')
    )
}

/// Find every text module in document order.
///
/// Each opening tag is matched with the next closing tag, so a text module
/// nested inside another ends the outer one early. An opening tag with no
/// closing tag after it ends the scan.
pub fn scan_text_modules(markup: &str) -> Vec<TextModule<'_>> {
    let bytes = markup.as_bytes();
    let open = memmem::Finder::new(TEXT_OPEN);
    let close = memmem::Finder::new(TEXT_CLOSE);

    let mut modules = Vec::new();
    let mut pos = 0;

    while let Some(rel) = open.find(&bytes[pos..]) {
        let start = pos + rel;
        if !name_ends(bytes, start, TEXT_OPEN) {
            pos = start + 1;
            continue;
        }

        let attrs_start = start + TEXT_OPEN.len();
        let Some(tag_len) = memchr::memchr(b']', &bytes[attrs_start..]) else {
            break;
        };
        let body_start = attrs_start + tag_len + 1;
        let Some(body_len) = close.find(&bytes[body_start..]) else {
            log::debug!("unterminated text module at byte {start}");
            break;
        };
        let body_end = body_start + body_len;
        let end = body_end + TEXT_CLOSE.len();

        modules.push(TextModule {
            attributes: &markup[attrs_start..body_start - 1],
            inner_html: &markup[body_start..body_end],
            span: start..end,
        });
        pos = end;
    }
    modules
}

/// Attributes of the innermost opening of `name` still open at the end of
/// `haystack`, and where that opening starts.
fn innermost_open<'a>(haystack: &'a str, open: &[u8], close: &[u8]) -> Option<(usize, &'a str)> {
    let bytes = haystack.as_bytes();
    let mut events: Vec<(usize, bool)> = memmem::find_iter(bytes, open)
        .filter(|&at| name_ends(bytes, at, open))
        .map(|at| (at, true))
        .chain(memmem::find_iter(bytes, close).map(|at| (at, false)))
        .collect();
    events.sort_unstable();

    let mut stack = Vec::new();
    for (at, is_open) in events {
        if is_open {
            stack.push(at);
        } else {
            stack.pop();
        }
    }

    let start = stack.pop()?;
    let attrs_start = start + open.len();
    let attrs_len = memchr::memchr(b']', &bytes[attrs_start..])?;
    Some((start, &haystack[attrs_start..attrs_start + attrs_len]))
}

/// The nearest enclosing row (and column inside it) for the byte `offset`.
///
/// An `[et_pb_row_inner]` opened inside the outer row wins over it.
pub fn find_wrappers(markup: &str, offset: usize) -> Option<Wrappers<'_>> {
    let before = markup.get(..offset)?;
    let outer = innermost_open(before, ROW_OPEN, ROW_CLOSE);
    let nested = innermost_open(before, ROW_INNER_OPEN, ROW_INNER_CLOSE)
        .filter(|&(at, _)| outer.is_none_or(|(row_at, _)| at > row_at));

    let (inner, (start, row)) = match nested {
        Some(found) => (true, found),
        None => (false, outer?),
    };
    let (open, close) = if inner {
        (COLUMN_INNER_OPEN, COLUMN_INNER_CLOSE)
    } else {
        (COLUMN_OPEN, COLUMN_CLOSE)
    };
    let column = innermost_open(&before[start..], open, close).map(|(_, attrs)| attrs);
    Some(Wrappers {
        start,
        row,
        column,
        inner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_finds_modules_in_order() {
        let markup = concat!(
            r#"[et_pb_section][et_pb_text admin_label="A"]<p>a</p>[/et_pb_text]"#,
            r#"[et_pb_text]<p>b</p>[/et_pb_text][/et_pb_section]"#,
        );
        let modules = scan_text_modules(markup);
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].attributes, r#" admin_label="A""#);
        assert_eq!(modules[0].inner_html, "<p>a</p>");
        assert_eq!(modules[1].attributes, "");
        assert_eq!(modules[1].inner_html, "<p>b</p>");
        assert_eq!(&markup[modules[1].span.clone()], "[et_pb_text]<p>b</p>[/et_pb_text]");
    }

    #[test]
    fn test_scan_empty_and_unterminated() {
        assert!(scan_text_modules("no shortcodes here").is_empty());
        let modules = scan_text_modules("[et_pb_text]a[/et_pb_text][et_pb_text]never closed");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].inner_html, "a");
    }

    #[test]
    fn test_scan_ignores_longer_tag_names() {
        let markup = "[et_pb_text_inner]x[/et_pb_text_inner][et_pb_text]y[/et_pb_text]";
        let modules = scan_text_modules(markup);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].inner_html, "y");
    }

    #[test]
    fn test_scan_nested_module_closes_outer_early() {
        let markup = "[et_pb_text]a[et_pb_text]b[/et_pb_text]c[/et_pb_text]";
        let modules = scan_text_modules(markup);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].inner_html, "a[et_pb_text]b");
    }

    #[test]
    fn test_scan_multiline_attributes() {
        let markup = "[et_pb_text\n  a=\"1\"]<p>x\n</p>[/et_pb_text]";
        let modules = scan_text_modules(markup);
        assert_eq!(modules[0].attributes, "\n  a=\"1\"");
        assert_eq!(modules[0].inner_html, "<p>x\n</p>");
    }

    #[test]
    fn test_find_wrappers_nearest_open_row() {
        let markup = concat!(
            r#"[et_pb_row admin_label="One"][et_pb_column type="1_2"][/et_pb_column][/et_pb_row]"#,
            r#"[et_pb_row admin_label="Two"][et_pb_column type="4_4"][et_pb_text]x[/et_pb_text]"#,
        );
        let offset = markup.find("[et_pb_text]").unwrap();
        let wrappers = find_wrappers(markup, offset).unwrap();
        assert_eq!(wrappers.row, r#" admin_label="Two""#);
        assert_eq!(wrappers.column, Some(r#" type="4_4""#));
        assert_eq!(wrappers.start, markup.find(r#"[et_pb_row admin_label="Two""#).unwrap());
        assert!(!wrappers.inner);
    }

    #[test]
    fn test_find_wrappers_prefers_open_inner_row() {
        let markup = concat!(
            r#"[et_pb_section specialty="on"][et_pb_column type="1_2" specialty_columns="2"]"#,
            r#"[et_pb_row_inner admin_label="Inner"][et_pb_column_inner type="4_4"]"#,
            "[et_pb_text]x[/et_pb_text]",
        );
        let offset = markup.find("[et_pb_text]").unwrap();
        let wrappers = find_wrappers(markup, offset).unwrap();
        assert!(wrappers.inner);
        assert_eq!(wrappers.row, r#" admin_label="Inner""#);
        assert_eq!(wrappers.column, Some(r#" type="4_4""#));
        assert_eq!(wrappers.row_tag(), "et_pb_row_inner");
        assert_eq!(wrappers.column_tag(), "et_pb_column_inner");
    }

    #[test]
    fn test_find_wrappers_closed_inner_row_is_skipped() {
        let markup = concat!(
            r#"[et_pb_row admin_label="Outer"][et_pb_column type="4_4"]"#,
            r#"[et_pb_row_inner][et_pb_column_inner type="1_2"][/et_pb_column_inner][/et_pb_row_inner]"#,
            "[et_pb_text]x[/et_pb_text]",
        );
        let offset = markup.find("[et_pb_text]").unwrap();
        let wrappers = find_wrappers(markup, offset).unwrap();
        assert!(!wrappers.inner);
        assert_eq!(wrappers.row, r#" admin_label="Outer""#);
        assert_eq!(wrappers.column, Some(r#" type="4_4""#));
    }

    #[test]
    fn test_find_wrappers_without_row() {
        let markup = "[et_pb_section][et_pb_text]x[/et_pb_text]";
        assert_eq!(find_wrappers(markup, 15), None);
    }

    #[test]
    fn test_find_wrappers_row_without_column() {
        let markup = r#"[et_pb_section][et_pb_row b="y"][et_pb_text]"#;
        let offset = markup.find("[et_pb_text]").unwrap();
        assert_eq!(
            find_wrappers(markup, offset),
            Some(Wrappers {
                start: 15,
                row: r#" b="y""#,
                column: None,
                inner: false,
            })
        );
    }
}
