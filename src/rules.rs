/*!
 * Static, data-driven tables: extension capabilities and the rule bundle
 *
 * Built once per run and injected; nothing here is mutated after
 * construction.
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use strum::Display;

use crate::comment::{CommentFormatter, CommentRule};
use crate::error::Result;
use crate::filter::PathFilter;
use crate::utils::{
    DEFAULT_COMMENT, DEFAULT_COMMENT_RULES, DEFAULT_IGNORE, DEFAULT_MANIFEST_NAMES,
    DEFAULT_STRUCTURAL_EXTENSIONS, DEFAULT_TEXT_EXTENSIONS,
};

/// What repoclip may do with a file of a given extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Capability {
    /// Dumped verbatim
    SupportedAsText,
    /// Reported and skipped
    Unsupported,
    /// Text, and summarised by declaration scan in tree mode
    StructuralExtraction,
}

impl Capability {
    /// Whether the raw content may be dumped
    pub fn is_text(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Which structural scan a file gets in tree mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum StructuralKind {
    /// Class, function and route declarations
    Declarations,
    /// One summary line per non-empty line
    Manifest,
}

/// Normalize an extension: lowercase, no leading dot
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Normalized extension of a path, empty when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| normalize_extension(&e.to_string_lossy()))
        .unwrap_or_default()
}

/// Maps normalized extensions to capabilities
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    capabilities: HashMap<String, Capability>,
    manifest_names: Vec<String>,
}

impl ExtensionTable {
    /// Build a table from text extensions, structural extensions and manifest names
    pub fn new<S: AsRef<str>>(text: &[S], structural: &[S], manifest_names: &[S]) -> Self {
        let mut capabilities = HashMap::new();
        for ext in text {
            capabilities.insert(normalize_extension(ext.as_ref()), Capability::SupportedAsText);
        }
        for ext in structural {
            capabilities.insert(
                normalize_extension(ext.as_ref()),
                Capability::StructuralExtraction,
            );
        }

        Self {
            capabilities,
            manifest_names: manifest_names
                .iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Classify a normalized extension.
    ///
    /// Empty extensions and extensions with non-alphanumeric characters pass
    /// through as text; any other unknown extension is unsupported.
    pub fn classify(&self, extension: &str) -> Capability {
        let ext = normalize_extension(extension);
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Capability::SupportedAsText;
        }
        self.capabilities
            .get(&ext)
            .copied()
            .unwrap_or(Capability::Unsupported)
    }

    /// Classify a path by its extension
    pub fn classify_path(&self, path: &Path) -> Capability {
        self.classify(&extension_of(path))
    }

    /// Structural scan for a file in tree mode, if any
    pub fn structural_kind(&self, path: &Path) -> Option<StructuralKind> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if self.manifest_names.iter().any(|m| *m == name) {
            Some(StructuralKind::Manifest)
        } else if self.classify_path(path) == Capability::StructuralExtraction {
            Some(StructuralKind::Declarations)
        } else {
            None
        }
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_TEXT_EXTENSIONS.as_slice(),
            DEFAULT_STRUCTURAL_EXTENSIONS.as_slice(),
            DEFAULT_MANIFEST_NAMES.as_slice(),
        )
    }
}

/// Delimiter pair as written in a rule file
#[derive(Debug, Clone, Deserialize)]
pub struct DelimiterSpec {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// One comment rule as written in a rule file
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRuleSpec {
    pub extensions: Vec<String>,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// JSON rule file. Every key is optional; missing keys keep the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    pub ignore: Option<Vec<String>>,
    pub text_extensions: Option<Vec<String>>,
    pub structural_extensions: Option<Vec<String>>,
    pub manifest_names: Option<Vec<String>>,
    pub comment_rules: Option<Vec<CommentRuleSpec>>,
    pub default_comment: Option<DelimiterSpec>,
}

impl RuleFile {
    /// Read and parse a rule file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Every table one run needs
#[derive(Debug, Clone)]
pub struct Rules {
    pub filter: PathFilter,
    pub extensions: ExtensionTable,
    pub comments: CommentFormatter,
}

impl Default for Rules {
    fn default() -> Self {
        Self::build(None, &[], true)
    }
}

impl Rules {
    /// Assemble rules from an optional rule file plus extra ignore patterns.
    ///
    /// `extra_ignores` are appended after the base list. With
    /// `default_ignores == false` the base list is empty unless the rule file
    /// provides one.
    pub fn build(file: Option<RuleFile>, extra_ignores: &[String], default_ignores: bool) -> Self {
        let file = file.unwrap_or_default();

        let mut ignores: Vec<String> = match file.ignore {
            Some(list) => list,
            None if default_ignores => DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
        };
        ignores.extend(extra_ignores.iter().cloned());

        let text = file
            .text_extensions
            .unwrap_or_else(|| owned(DEFAULT_TEXT_EXTENSIONS.as_slice()));
        let structural = file
            .structural_extensions
            .unwrap_or_else(|| owned(DEFAULT_STRUCTURAL_EXTENSIONS.as_slice()));
        let manifests = file
            .manifest_names
            .unwrap_or_else(|| owned(DEFAULT_MANIFEST_NAMES.as_slice()));

        let comment_rules = match file.comment_rules {
            Some(specs) => specs
                .into_iter()
                .map(|s| CommentRule::new(s.extensions.as_slice(), &s.prefix, &s.suffix))
                .collect(),
            None => DEFAULT_COMMENT_RULES
                .iter()
                .map(|(exts, prefix, suffix)| CommentRule::new(exts.as_slice(), prefix, suffix))
                .collect(),
        };
        let fallback = match file.default_comment {
            Some(d) => (d.prefix, d.suffix),
            None => (DEFAULT_COMMENT.0.to_string(), DEFAULT_COMMENT.1.to_string()),
        };

        Self {
            filter: PathFilter::new(ignores),
            extensions: ExtensionTable::new(
                text.as_slice(),
                structural.as_slice(),
                manifests.as_slice(),
            ),
            comments: CommentFormatter::new(comment_rules, fallback),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
