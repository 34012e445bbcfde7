//! Spreading generated modules over continuation rows.
//!
//! A row holds at most `capacity` modules. The first modules stay in the row
//! the original module sat in. Once it is full the current column/row is
//! closed and a copy of the original wrappers is opened:
//!
//! ```text
//! [et_pb_row admin_label="Intro"][et_pb_column …]  <- existing, kept
//!   m1 m2
//! [/et_pb_column][/et_pb_row]
//! [et_pb_row admin_label="Intro (Fortsetzung)" …][et_pb_column …]
//!   m3 m4
//! [/et_pb_column][/et_pb_row]                      <- existing close tags
//! ```
//!
//! Several text modules can share one source row. [`RowLayout`] keeps the
//! fill of the row that is currently open so the next module continues
//! where the previous one stopped.

use crate::label::sanitize_label;
use crate::shortcode::{Wrappers, admin_label, sanitize_attributes, strip_admin_label};

/// Attributes of a column opened when the source row has no column.
const DEFAULT_COLUMN_ATTRS: &str = r#"type="4_4" parallax="off" parallax_method="on""#;

/// Suffix marking a continuation row's label.
pub const CONTINUATION_SUFFIX: &str = " (Fortsetzung)";

/// Module placement inside one source row and its continuation rows.
#[derive(Debug, Clone)]
pub struct RowLayout<'a> {
    wrappers: Wrappers<'a>,
    capacity: usize,
    /// Modules in the row that is open right now.
    used: usize,
    /// Rows so far, the source row included.
    rows: usize,
}

impl<'a> RowLayout<'a> {
    /// A layout for an empty source row. A zero capacity never opens rows.
    pub fn new(wrappers: Wrappers<'a>, capacity: usize) -> Self {
        Self {
            wrappers,
            capacity,
            used: 0,
            rows: 1,
        }
    }

    /// Whether this layout belongs to the row opened at `wrappers.start`.
    pub fn same_row(&self, wrappers: &Wrappers<'_>) -> bool {
        self.wrappers.start == wrappers.start && self.wrappers.inner == wrappers.inner
    }

    /// Append `modules` to the open row, opening continuation rows as the
    /// capacity runs out. Returns the markup and the number of rows opened.
    pub fn place(&mut self, modules: &[String]) -> (String, usize) {
        let mut out = String::with_capacity(modules.iter().map(String::len).sum());
        let mut opened = 0;
        for module in modules {
            if self.capacity > 0 && self.used == self.capacity {
                self.rows += 1;
                self.used = 0;
                opened += 1;
                self.open_continuation(&mut out);
            }
            out.push_str(module);
            self.used += 1;
        }
        (out, opened)
    }

    fn open_continuation(&self, out: &mut String) {
        let (row_tag, column_tag) = (self.wrappers.row_tag(), self.wrappers.column_tag());
        out.push_str(&format!("[/{column_tag}][/{row_tag}]"));
        out.push_str(&continuation_row(row_tag, self.wrappers.row, self.rows));
        out.push_str(&column_open(column_tag, self.wrappers.column));
    }
}

/// Lay out `modules` in rows of at most `capacity` modules, starting from an
/// empty row.
///
/// Without an enclosing row or without a capacity the modules are simply
/// concatenated.
pub fn rebalance(modules: &[String], wrappers: Option<&Wrappers<'_>>, capacity: Option<usize>) -> String {
    let (Some(wrappers), Some(capacity)) = (wrappers, capacity.filter(|&c| c > 0)) else {
        return modules.concat();
    };
    RowLayout::new(*wrappers, capacity).place(modules).0
}

fn continuation_row(row_tag: &str, row_attrs: &str, row_number: usize) -> String {
    let label = match admin_label(row_attrs) {
        Some(label) if !label.trim().is_empty() => {
            format!("{}{CONTINUATION_SUFFIX}", sanitize_label(label))
        }
        _ => format!("Zeile {row_number}{CONTINUATION_SUFFIX}"),
    };
    let rest = sanitize_attributes(&strip_admin_label(row_attrs));

    if rest.is_empty() {
        format!("[{row_tag} admin_label=\"{label}\"]")
    } else {
        format!("[{row_tag} admin_label=\"{label}\" {rest}]")
    }
}

fn column_open(column_tag: &str, column_attrs: Option<&str>) -> String {
    match column_attrs.map(str::trim).filter(|attrs| !attrs.is_empty()) {
        Some(attrs) => format!("[{column_tag} {}]", sanitize_attributes(attrs)),
        None => format!("[{column_tag} {DEFAULT_COLUMN_ATTRS}]"),
    }
}
