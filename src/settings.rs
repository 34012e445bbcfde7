//! Transformation settings.
//!
//! The field names follow the settings JSON written by the export tool's
//! settings form, so a saved settings file can be fed straight to
//! [`Settings::from_json`].

use serde::Deserialize;

use crate::error::Result;

/// Processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Replace each text module in place, no row handling.
    Normal,
    /// Track paragraph budgets and spread modules over rows.
    #[default]
    Advanced,
    /// Same pipeline as `Advanced`.
    Dev,
}

impl Mode {
    /// Whether this mode tracks per-module paragraph budgets and groups
    /// modules into wrapper rows.
    pub fn groups_rows(self) -> bool {
        matches!(self, Mode::Advanced | Mode::Dev)
    }
}

/// Which top-level elements start a new module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplitTags {
    pub h1: bool,
    pub h2: bool,
    pub h3: bool,
    pub h4: bool,
    pub h5: bool,
    pub h6: bool,
    pub blockquote: bool,
    pub ol: bool,
    pub ul: bool,
}

impl SplitTags {
    /// No split triggers at all.
    pub const NONE: SplitTags = SplitTags {
        h1: false,
        h2: false,
        h3: false,
        h4: false,
        h5: false,
        h6: false,
        blockquote: false,
        ol: false,
        ul: false,
    };

    /// Tag names of the enabled triggers.
    pub fn tags(&self) -> Vec<&'static str> {
        [
            (self.h1, "h1"),
            (self.h2, "h2"),
            (self.h3, "h3"),
            (self.h4, "h4"),
            (self.h5, "h5"),
            (self.h6, "h6"),
            (self.blockquote, "blockquote"),
            (self.ol, "ol"),
            (self.ul, "ul"),
        ]
        .into_iter()
        .filter_map(|(on, tag)| on.then_some(tag))
        .collect()
    }

    /// Enable the trigger for `tag`. Returns false for unknown tag names.
    pub fn enable(&mut self, tag: &str) -> bool {
        let slot = match tag.trim().to_ascii_lowercase().as_str() {
            "h1" => &mut self.h1,
            "h2" => &mut self.h2,
            "h3" => &mut self.h3,
            "h4" => &mut self.h4,
            "h5" => &mut self.h5,
            "h6" => &mut self.h6,
            "blockquote" => &mut self.blockquote,
            "ol" => &mut self.ol,
            "ul" => &mut self.ul,
            _ => return false,
        };
        *slot = true;
        true
    }
}

impl Default for SplitTags {
    fn default() -> Self {
        Self {
            h1: true,
            h2: true,
            h3: true,
            h4: true,
            h5: true,
            h6: false,
            blockquote: true,
            ol: true,
            ul: true,
        }
    }
}

/// Configuration for one transformation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub mode: Mode,
    pub splits: SplitTags,
    pub process_footnotes: bool,
    /// Turn unordered lists into one blockquote per item.
    pub process_interview_lists: bool,
    pub process_tag_merging: bool,
    pub remove_empty_spans: bool,
    pub fix_link_icons: bool,
    /// 0 means no limit.
    pub max_modules_per_row: usize,
    /// 0 means no limit.
    pub max_paragraphs_per_module: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Advanced,
            splits: SplitTags::default(),
            process_footnotes: false,
            process_interview_lists: false,
            process_tag_merging: true,
            remove_empty_spans: false,
            fix_link_icons: false,
            max_modules_per_row: 2,
            max_paragraphs_per_module: 0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The paragraph budget in effect, if any.
    pub fn paragraph_budget(&self) -> Option<usize> {
        (self.mode.groups_rows() && self.max_paragraphs_per_module > 0)
            .then_some(self.max_paragraphs_per_module)
    }

    /// The per-row module capacity in effect, if any.
    pub fn row_capacity(&self) -> Option<usize> {
        (self.mode.groups_rows() && self.max_modules_per_row > 0).then_some(self.max_modules_per_row)
    }
}
