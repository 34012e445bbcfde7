//! Divi shortcode markup: scanning, attribute helpers and module assembly.

mod attrs;
mod scanner;

pub use attrs::{admin_label, sanitize_attributes, strip_admin_label};
pub use scanner::{TextModule, Wrappers, find_wrappers, scan_text_modules};

/// Build a `[et_pb_text]` module around `html`.
///
/// Existing admin labels in `attributes` are replaced by `label`.
pub fn text_module(attributes: &str, label: &str, html: &str) -> String {
    let attrs = strip_admin_label(attributes);
    let mut out = String::with_capacity(html.len() + attrs.len() + label.len() + 48);
    out.push_str("[et_pb_text ");
    if !attrs.is_empty() {
        out.push_str(&attrs);
        out.push(' ');
    }
    out.push_str("admin_label=\"");
    out.push_str(label);
    out.push_str("\"]");
    out.push_str(html);
    out.push_str("[/et_pb_text]");
    out
}
