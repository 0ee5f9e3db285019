/*!
 * Comment-delimited file blocks
 *
 * Each dumped file becomes:
 *
 * ```text
 * <prefix><label>/<filename><suffix>
 *
 * <content>
 *
 * <prefix>End of file: <filename><suffix>
 *
 *
 * ```
 *
 * Downstream consumers split the aggregated text on this exact spacing.
 */

use std::path::{Component, Path, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use crate::rules::{extension_of, normalize_extension};

/// Extensions sharing one delimiter pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRule {
    extensions: Vec<String>,
    prefix: String,
    suffix: String,
}

impl CommentRule {
    pub fn new<S: AsRef<str>>(extensions: &[S], prefix: &str, suffix: &str) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| normalize_extension(e.as_ref()))
                .collect(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    fn covers(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }
}

/// A block recovered from formatted output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedBlock {
    pub label: String,
    pub filename: String,
    pub content: String,
}

/// Wraps file content in language-appropriate comment headers
#[derive(Debug, Clone)]
pub struct CommentFormatter {
    rules: Vec<CommentRule>,
    fallback: (String, String),
}

impl CommentFormatter {
    pub fn new(rules: Vec<CommentRule>, fallback: (String, String)) -> Self {
        Self { rules, fallback }
    }

    /// Delimiters for an extension: the first rule that lists it wins.
    pub fn delimiters(&self, extension: &str) -> (&str, &str) {
        let ext = normalize_extension(extension);
        self.rules
            .iter()
            .find(|rule| rule.covers(&ext))
            .map(|rule| (rule.prefix.as_str(), rule.suffix.as_str()))
            .unwrap_or((self.fallback.0.as_str(), self.fallback.1.as_str()))
    }

    /// Format one block
    pub fn wrap(&self, extension: &str, label: &str, filename: &str, content: &str) -> String {
        let (prefix, suffix) = self.delimiters(extension);
        format!(
            "{prefix}{label}{sep}{filename}{suffix}\n\n{content}\n\n{footer}\n\n\n",
            sep = MAIN_SEPARATOR,
            footer = footer_line(prefix, suffix, filename),
        )
    }

    /// Format a block for a file path, deriving label, name and extension
    pub fn wrap_file(&self, path: &Path, content: &str) -> String {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let label = path.parent().map(truncated_label).unwrap_or_default();
        self.wrap(&extension_of(path), &label, &filename, content)
    }

    /// Parse a single block produced by [`wrap`](Self::wrap)
    pub fn unwrap(&self, block: &str) -> Option<WrappedBlock> {
        let (label, filename, prefix, suffix, body) = self.parse_header(block)?;
        let footer = format!("\n\n{}\n\n\n", footer_line(prefix, suffix, &filename));
        let content = body.strip_suffix(footer.as_str())?;
        Some(WrappedBlock {
            label,
            filename,
            content: content.to_string(),
        })
    }

    /// Split a flat-mode blob back into its blocks, in order.
    ///
    /// Stops at the first fragment that does not parse as a block.
    pub fn split_blocks(&self, blob: &str) -> Vec<WrappedBlock> {
        let mut blocks = Vec::new();
        let mut rest = blob;

        while let Some((label, filename, prefix, suffix, body)) = self.parse_header(rest) {
            let footer = format!("\n\n{}\n\n\n", footer_line(prefix, suffix, &filename));
            let Some(end) = body.find(footer.as_str()) else {
                break;
            };
            blocks.push(WrappedBlock {
                label,
                filename,
                content: body[..end].to_string(),
            });
            rest = &body[end + footer.len()..];
            rest = rest.strip_prefix('\n').unwrap_or(rest);
        }

        blocks
    }

    /// Header line and the following blank line. Returns the body after them.
    fn parse_header<'a>(&'a self, text: &'a str) -> Option<(String, String, &'a str, &'a str, &'a str)> {
        let (header, body) = text.split_once('\n')?;
        let body = body.strip_prefix('\n')?;

        let candidates = self
            .rules
            .iter()
            .map(|r| (r.prefix.as_str(), r.suffix.as_str()))
            .chain(std::iter::once((
                self.fallback.0.as_str(),
                self.fallback.1.as_str(),
            )));

        for (prefix, suffix) in candidates {
            let Some(inner) = header
                .strip_prefix(prefix)
                .and_then(|h| h.strip_suffix(suffix))
            else {
                continue;
            };
            let Some((label, filename)) = inner.rsplit_once(MAIN_SEPARATOR) else {
                continue;
            };
            if self.delimiters(&extension_of(Path::new(filename))) != (prefix, suffix) {
                continue;
            }
            return Some((label.to_string(), filename.to_string(), prefix, suffix, body));
        }

        None
    }
}

fn footer_line(prefix: &str, suffix: &str, filename: &str) -> String {
    format!("{prefix}End of file: {filename}{suffix}")
}

/// At most the last two segments of a directory, rejoined.
///
/// Absolute paths never reach the output in full.
pub fn truncated_label(dir: &Path) -> String {
    let segments: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let start = segments.len().saturating_sub(2);
    segments[start..].join(MAIN_SEPARATOR_STR)
}
