//! # divisplit
//!
//! Split long Divi page-builder text modules into smaller ones.
//!
//! ## Features
//!
//! - Find `[et_pb_text]` modules in shortcode markup
//! - Clean up their HTML: footnote linking, interview lists to quotes,
//!   link icon removal, empty span removal, fragmented tag merging
//! - Split at headings, quotes and lists, or after N paragraphs
//! - Label every generated module for the builder UI
//! - Spread the modules over continuation rows with a per-row limit
//!
//! ## Quick Start
//!
//! ```
//! use divisplit::{Settings, transform_markup};
//!
//! let markup = "[et_pb_text]<h2>A</h2><p>one</p><h2>B</h2><p>two</p>[/et_pb_text]";
//! let mut log: Vec<String> = Vec::new();
//! let out = transform_markup(markup, &Settings::default(), &mut log).unwrap();
//!
//! assert_eq!(out.matches("[/et_pb_text]").count(), 2);
//! assert!(out.contains(r#"admin_label="HEAD - B""#));
//! ```
//!
//! Whole JSON exports go through [`transform_document`], which maps
//! [`transform_markup`] over the `data` fields.

pub mod document;
pub mod dom;
pub mod error;
pub mod label;
pub mod log_sink;
pub mod normalize;
pub mod rebalance;
pub mod settings;
pub mod shortcode;
pub mod split;
pub mod transform;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::{transform_document, transform_json};
pub use error::{Error, Result};
pub use label::admin_label_for;
pub use log_sink::{FallibleSink, LogSink};
pub use rebalance::{RowLayout, rebalance};
pub use settings::{Mode, Settings, SplitTags};
pub use shortcode::{TextModule, Wrappers, find_wrappers, scan_text_modules};
pub use split::{Chunk, split_html};
pub use transform::transform_markup;
pub use util::decode_text;
