//! Admin labels for generated modules.

use crate::dom::parse_fragment;

/// Label used when a chunk has no element to describe it.
pub const FALLBACK_LABEL: &str = "Text-Modul";

const MAX_LABEL_CHARS: usize = 40;
const TRUNCATED_CHARS: usize = 37;

/// Derive an admin label from the first element of `html`.
///
/// Headings get `HEAD - `, quotes `ZITAT - ` and lists `LISTE - ` in front
/// of their text. Other elements are labelled with their text alone.
pub fn admin_label_for(html: &str) -> String {
    let fragment = parse_fragment(html);
    let dom = &fragment.dom;
    let Some(first) = dom.element_children(fragment.body).into_iter().next() else {
        return FALLBACK_LABEL.to_string();
    };
    let Some(tag) = dom.element_name(first) else {
        return FALLBACK_LABEL.to_string();
    };

    let text = label_text(dom.text_content(first).trim());
    let prefix = match &**tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "HEAD - ",
        "blockquote" => "ZITAT - ",
        "ol" | "ul" => "LISTE - ",
        _ => "",
    };
    format!("{prefix}{text}")
}

/// Replace characters that would end the attribute or the shortcode.
pub fn sanitize_label(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '[' => '(',
            ']' => ')',
            '"' => '\'',
            c => c,
        })
        .collect()
}

fn label_text(text: &str) -> String {
    let text = sanitize_label(text);
    if text.chars().count() > MAX_LABEL_CHARS {
        let mut cut: String = text.chars().take(TRUNCATED_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(admin_label_for("<h2>Intro</h2><p>x</p>"), "HEAD - Intro");
        assert_eq!(admin_label_for("<blockquote><p>Q</p></blockquote>"), "ZITAT - Q");
        assert_eq!(admin_label_for("<ol><li>a</li><li>b</li></ol>"), "LISTE - ab");
        assert_eq!(admin_label_for("<p>  Plain text </p>"), "Plain text");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(admin_label_for(""), FALLBACK_LABEL);
        assert_eq!(admin_label_for("only text"), FALLBACK_LABEL);
    }

    #[test]
    fn test_leading_text_is_skipped() {
        assert_eq!(admin_label_for("\n<h3>Title</h3>"), "HEAD - Title");
    }

    #[test]
    fn test_sanitizes_shortcode_characters() {
        assert_eq!(
            admin_label_for(r#"<p>A "quoted" [note]</p>"#),
            "A 'quoted' (note)"
        );
    }

    #[test]
    fn test_truncation() {
        let forty = "a".repeat(40);
        assert_eq!(admin_label_for(&format!("<p>{forty}</p>")), forty);

        let long = "ä".repeat(41);
        let label = admin_label_for(&format!("<h1>{long}</h1>"));
        assert_eq!(label, format!("HEAD - {}...", "ä".repeat(37)));
    }
}
