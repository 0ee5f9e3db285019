/*!
 * Core types shared by the walker, extractor and assembler
 */

use std::path::PathBuf;

/// One surviving node of a tree walk.
///
/// Produced in traversal order and dropped once its line is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// Absolute path of the entry
    pub path: PathBuf,
    /// Nesting depth below the walked root (root children are 0)
    pub depth: usize,
    /// Directory or file
    pub is_directory: bool,
    /// Last surviving sibling at this depth
    pub is_last: bool,
}

impl PathEntry {
    /// Display name of the entry
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// How a run turns its roots into text
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// ASCII tree listing with nested structural summaries
    Tree,
    /// Every file wrapped in comment headers, concatenated
    #[default]
    Flat,
}
