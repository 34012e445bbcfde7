//! Transforming one markup field.
//!
//! Every text module found by the scanner goes through the same steps:
//!
//! 1. Parse its inner HTML and run the enabled normalization passes
//! 2. Split the normalized HTML into chunks
//! 3. Wrap each chunk in a fresh module with a generated admin label
//! 4. Spread the modules over continuation rows (advanced and dev mode),
//!    counting modules already placed in the same row
//!
//! The results are spliced back over the original spans; markup outside the
//! modules is copied through unchanged.

use crate::dom::parse_fragment;
use crate::error::Result;
use crate::label::admin_label_for;
use crate::log_sink::LogSink;
use crate::normalize::normalize;
use crate::rebalance::RowLayout;
use crate::settings::Settings;
use crate::shortcode::{find_wrappers, scan_text_modules, text_module};
use crate::split::{Chunk, split_html};

/// Rewrite every text module in `markup`.
pub fn transform_markup(markup: &str, settings: &Settings, log: &mut dyn LogSink) -> Result<String> {
    let modules = scan_text_modules(markup);
    if modules.is_empty() {
        return Ok(markup.to_string());
    }
    log.log(&format!("Found {} text module(s)", modules.len()));

    let triggers = settings.splits.tags();
    let budget = settings.paragraph_budget();
    let capacity = settings.row_capacity();

    let mut out = String::with_capacity(markup.len() + markup.len() / 4);
    let mut pos = 0;
    // Fill of the row the previous module was placed in
    let mut layout: Option<RowLayout<'_>> = None;

    for module in &modules {
        out.push_str(&markup[pos..module.span.start]);
        pos = module.span.end;

        let rendered = if module.inner_html.is_empty() {
            vec![markup[module.span.clone()].to_string()]
        } else {
            let chunks = process_module_html(module.inner_html, settings, &triggers, budget, log)?;
            if chunks.len() > 1 {
                log.log(&format!("Split module into {} modules", chunks.len()));
            }
            chunks
                .iter()
                .map(|chunk| text_module(module.attributes, &admin_label_for(&chunk.html), &chunk.html))
                .collect()
        };

        let wrappers = capacity.and_then(|_| find_wrappers(markup, module.span.start));
        let (Some(wrappers), Some(capacity)) = (wrappers, capacity) else {
            out.push_str(&rendered.concat());
            continue;
        };
        let row = match layout.take() {
            Some(open) if open.same_row(&wrappers) => open,
            _ => RowLayout::new(wrappers, capacity),
        };
        let row = layout.insert(row);
        let (placed, added) = row.place(&rendered);
        if added > 0 {
            log.log(&format!("Added {added} continuation row(s)"));
        }
        out.push_str(&placed);
    }

    out.push_str(&markup[pos..]);
    Ok(out)
}

/// Normalize one module body and split it into chunks.
pub fn process_module_html(
    html: &str,
    settings: &Settings,
    triggers: &[&str],
    paragraph_budget: Option<usize>,
    log: &mut dyn LogSink,
) -> Result<Vec<Chunk>> {
    let mut fragment = parse_fragment(html);
    normalize(&mut fragment.dom, fragment.body, settings, log)?;
    let normalized = fragment.inner_html();
    Ok(split_html(&normalized, triggers, paragraph_budget))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Mode, SplitTags};

    fn normal() -> Settings {
        Settings {
            mode: Mode::Normal,
            ..Settings::default()
        }
    }

    #[test]
    fn test_markup_without_modules_is_untouched() {
        let markup = "[et_pb_section][et_pb_image src=\"x\"][/et_pb_section]";
        let mut log: Vec<String> = Vec::new();
        assert_eq!(transform_markup(markup, &normal(), &mut log).unwrap(), markup);
        assert!(log.is_empty());
    }

    #[test]
    fn test_splits_module_at_headings() {
        let markup = "[et_pb_text admin_label=\"Old\"]<h2>A</h2><p>one</p><h2>B</h2><p>two</p>[/et_pb_text]";
        let mut log: Vec<String> = Vec::new();
        let out = transform_markup(markup, &normal(), &mut log).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"[et_pb_text admin_label="HEAD - A"]<h2>A</h2><p>one</p>[/et_pb_text]"#,
                r#"[et_pb_text admin_label="HEAD - B"]<h2>B</h2><p>two</p>[/et_pb_text]"#,
            )
        );
        assert_eq!(log, vec!["Found 1 text module(s)", "Split module into 2 modules"]);
    }

    #[test]
    fn test_surrounding_markup_is_preserved() {
        let markup = "[et_pb_section][et_pb_text]<p>x</p>[/et_pb_text][et_pb_image][/et_pb_section]";
        let out = transform_markup(markup, &normal(), &mut Vec::<String>::new()).unwrap();
        assert_eq!(
            out,
            "[et_pb_section][et_pb_text admin_label=\"x\"]<p>x</p>[/et_pb_text][et_pb_image][/et_pb_section]"
        );
    }

    #[test]
    fn test_empty_module_is_skipped() {
        let markup = "[et_pb_text admin_label=\"Keep\"][/et_pb_text]";
        let out = transform_markup(markup, &normal(), &mut Vec::<String>::new()).unwrap();
        assert_eq!(out, markup);
    }

    #[test]
    fn test_advanced_mode_opens_continuation_rows() {
        let markup = concat!(
            r#"[et_pb_row admin_label="Body"][et_pb_column type="4_4"]"#,
            "[et_pb_text]<h3>A</h3><h3>B</h3><h3>C</h3>[/et_pb_text]",
            "[/et_pb_column][/et_pb_row]",
        );
        let settings = Settings {
            max_modules_per_row: 2,
            ..Settings::default()
        };
        let mut log: Vec<String> = Vec::new();
        let out = transform_markup(markup, &settings, &mut log).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"[et_pb_row admin_label="Body"][et_pb_column type="4_4"]"#,
                r#"[et_pb_text admin_label="HEAD - A"]<h3>A</h3>[/et_pb_text]"#,
                r#"[et_pb_text admin_label="HEAD - B"]<h3>B</h3>[/et_pb_text]"#,
                "[/et_pb_column][/et_pb_row]",
                r#"[et_pb_row admin_label="Body (Fortsetzung)"][et_pb_column type="4_4"]"#,
                r#"[et_pb_text admin_label="HEAD - C"]<h3>C</h3>[/et_pb_text]"#,
                "[/et_pb_column][/et_pb_row]",
            )
        );
        assert_eq!(log.last().map(String::as_str), Some("Added 1 continuation row(s)"));
    }

    #[test]
    fn test_modules_sharing_a_row_share_its_capacity() {
        let markup = concat!(
            r#"[et_pb_row admin_label="Body"][et_pb_column type="4_4"]"#,
            "[et_pb_text]<h3>A</h3><h3>B</h3><h3>C</h3>[/et_pb_text]",
            "[et_pb_text]<h3>D</h3><h3>E</h3><h3>F</h3>[/et_pb_text]",
            "[/et_pb_column][/et_pb_row]",
        );
        let settings = Settings {
            max_modules_per_row: 2,
            ..Settings::default()
        };
        let mut log: Vec<String> = Vec::new();
        let out = transform_markup(markup, &settings, &mut log).unwrap();

        let rows: Vec<usize> = out
            .split("[/et_pb_row]")
            .filter(|row| !row.is_empty())
            .map(|row| row.matches("[et_pb_text ").count())
            .collect();
        assert_eq!(rows, vec![2, 2, 2]);
        assert_eq!(out.matches(r#"[et_pb_row admin_label="Body (Fortsetzung)"]"#).count(), 2);
        assert_eq!(
            log,
            vec![
                "Found 2 text module(s)",
                "Split module into 3 modules",
                "Added 1 continuation row(s)",
                "Split module into 3 modules",
                "Added 1 continuation row(s)",
            ]
        );
    }

    #[test]
    fn test_modules_in_different_rows_fill_separately() {
        let markup = concat!(
            "[et_pb_row][et_pb_column type=\"4_4\"]",
            "[et_pb_text]<h3>A</h3>[/et_pb_text]",
            "[/et_pb_column][/et_pb_row]",
            "[et_pb_row][et_pb_column type=\"4_4\"]",
            "[et_pb_text]<h3>B</h3><h3>C</h3>[/et_pb_text]",
            "[/et_pb_column][/et_pb_row]",
        );
        let settings = Settings {
            max_modules_per_row: 2,
            ..Settings::default()
        };
        let out = transform_markup(markup, &settings, &mut Vec::<String>::new()).unwrap();
        assert!(!out.contains("(Fortsetzung)"));
        assert_eq!(out.matches("[/et_pb_row]").count(), 2);
    }

    #[test]
    fn test_empty_module_takes_a_slot() {
        let markup = concat!(
            "[et_pb_row][et_pb_column type=\"4_4\"]",
            "[et_pb_text][/et_pb_text]",
            "[et_pb_text]<h3>A</h3><h3>B</h3>[/et_pb_text]",
            "[/et_pb_column][/et_pb_row]",
        );
        let settings = Settings {
            max_modules_per_row: 2,
            ..Settings::default()
        };
        let out = transform_markup(markup, &settings, &mut Vec::<String>::new()).unwrap();
        assert_eq!(out.matches(r#"[et_pb_row admin_label="Zeile 2 (Fortsetzung)"]"#).count(), 1);
        assert!(out.starts_with("[et_pb_row][et_pb_column type=\"4_4\"][et_pb_text][/et_pb_text][et_pb_text "));
    }

    #[test]
    fn test_paragraph_budget_in_advanced_mode() {
        let markup = "[et_pb_text]<p>1</p><p>2</p><p>3</p>[/et_pb_text]";
        let settings = Settings {
            splits: SplitTags::NONE,
            max_paragraphs_per_module: 2,
            max_modules_per_row: 0,
            ..Settings::default()
        };
        let out = transform_markup(markup, &settings, &mut Vec::<String>::new()).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"[et_pb_text admin_label="1"]<p>1</p><p>2</p>[/et_pb_text]"#,
                r#"[et_pb_text admin_label="3"]<p>3</p>[/et_pb_text]"#,
            )
        );
    }

    #[test]
    fn test_normal_mode_ignores_budgets() {
        let markup = "[et_pb_text]<p>1</p><p>2</p><p>3</p>[/et_pb_text]";
        let settings = Settings {
            max_paragraphs_per_module: 1,
            ..normal()
        };
        let out = transform_markup(markup, &settings, &mut Vec::<String>::new()).unwrap();
        assert_eq!(out.matches("[et_pb_text ").count(), 1);
    }
}
