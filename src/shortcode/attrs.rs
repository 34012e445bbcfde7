//! Helpers for shortcode attribute strings (`admin_label="x" type="4_4"`).

const ADMIN_LABEL: &str = "admin_label=\"";

/// Make an attribute string safe to paste into a new shortcode opening.
///
/// Inside quoted values, `[` and `]` become `(` and `)` and stray inner
/// double quotes become single quotes. A `"` only closes a value when the
/// rest of the string is empty or continues with whitespace and the next
/// `name=`.
pub fn sanitize_attributes(attrs: &str) -> String {
    let mut out = String::with_capacity(attrs.len());
    let mut in_value = false;
    let mut prev = None;

    for (i, c) in attrs.char_indices() {
        match c {
            '"' if !in_value => {
                in_value = prev == Some('=');
                out.push(c);
            }
            '"' => {
                if closes_value(&attrs[i + 1..]) {
                    in_value = false;
                    out.push('"');
                } else {
                    out.push('\'');
                }
            }
            '[' if in_value => out.push('('),
            ']' if in_value => out.push(')'),
            _ => out.push(c),
        }
        prev = Some(c);
    }
    out
}

/// Whether a quote followed by `rest` ends an attribute value.
fn closes_value(rest: &str) -> bool {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.len() == rest.len() {
        return false;
    }
    let name_len = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(trimmed.len());
    name_len > 0 && trimmed[name_len..].starts_with('=')
}

/// Byte ranges of every `admin_label="…"` in `attrs`.
fn admin_label_spans(attrs: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(rel) = attrs[pos..].find(ADMIN_LABEL) {
        let start = pos + rel;
        let value_start = start + ADMIN_LABEL.len();
        let at_boundary = attrs[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        let Some(value_len) = attrs[value_start..].find('"') else {
            break;
        };
        let end = value_start + value_len + 1;
        if at_boundary {
            spans.push((start, end));
        }
        pos = end;
    }
    spans
}

/// The value of the first `admin_label` attribute.
pub fn admin_label(attrs: &str) -> Option<&str> {
    admin_label_spans(attrs)
        .first()
        .map(|&(start, end)| &attrs[start + ADMIN_LABEL.len()..end - 1])
}

/// Remove every `admin_label` attribute and trim the rest.
pub fn strip_admin_label(attrs: &str) -> String {
    let mut out = String::with_capacity(attrs.len());
    let mut pos = 0;
    for (start, end) in admin_label_spans(attrs) {
        out.push_str(&attrs[pos..start]);
        pos = end;
    }
    out.push_str(&attrs[pos..]);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_brackets_in_values() {
        assert_eq!(
            sanitize_attributes(r#"title="See [1]" type="4_4""#),
            r#"title="See (1)" type="4_4""#
        );
    }

    #[test]
    fn test_sanitize_inner_quotes() {
        assert_eq!(
            sanitize_attributes(r#"admin_label="The "Best" Row" module_id="x""#),
            r#"admin_label="The 'Best' Row" module_id="x""#
        );
        assert_eq!(
            sanitize_attributes(r#"text="say "hi"""#),
            r#"text="say 'hi'""#
        );
    }

    #[test]
    fn test_sanitize_leaves_clean_attributes() {
        let attrs = r##" _builder_version="4.16" background_color="#fff""##;
        assert_eq!(sanitize_attributes(attrs), attrs);
        assert_eq!(sanitize_attributes(""), "");
    }

    #[test]
    fn test_admin_label() {
        assert_eq!(admin_label(r#" admin_label="Intro" x="1""#), Some("Intro"));
        assert_eq!(admin_label(r#"x="1" admin_label="""#), Some(""));
        assert_eq!(admin_label(r#"x="1""#), None);
        assert_eq!(admin_label(r#"my_admin_label="no""#), None);
    }

    #[test]
    fn test_strip_admin_label() {
        assert_eq!(
            strip_admin_label(r#" admin_label="Old" _builder_version="4.16""#),
            r#"_builder_version="4.16""#
        );
        assert_eq!(
            strip_admin_label(r#"a="1" admin_label="x" admin_label="y""#),
            r#"a="1""#
        );
        assert_eq!(strip_admin_label(r#" admin_label="only""#), "");
    }
}
