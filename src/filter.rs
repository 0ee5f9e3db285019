/*!
 * Segment-based ignore rules
 *
 * A path is excluded when any of its segments matches any rule. Rules are
 * fixed when the filter is built and matched case-insensitively.
 */

use std::path::{Component, Path};

use glob_match::glob_match;

/// One case-insensitive matcher applied to a single path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreRule {
    /// `^name$`: the whole segment
    Exact(String),
    /// `^name`: segment starts with
    Prefix(String),
    /// `name$`: segment ends with
    Suffix(String),
    /// Any segment containing the text
    Substring(String),
    /// `*`/`?` wildcards over one segment
    Glob(String),
}

impl IgnoreRule {
    /// Parse a pattern string into a rule
    pub fn parse(pattern: &str) -> Self {
        let lowered = pattern.trim().to_lowercase();
        let anchored_start = lowered.starts_with('^');
        let anchored_end = lowered.len() > 1 && lowered.ends_with('$');

        let body = {
            let s = if anchored_start { &lowered[1..] } else { &lowered[..] };
            if anchored_end {
                &s[..s.len() - 1]
            } else {
                s
            }
        };

        if body.is_empty() {
            // matches nothing
            return Self::Substring(String::new());
        }

        match (anchored_start, anchored_end) {
            (true, true) => Self::Exact(body.to_string()),
            (true, false) => Self::Prefix(body.to_string()),
            (false, true) => Self::Suffix(body.to_string()),
            (false, false) if body.contains('*') || body.contains('?') => {
                Self::Glob(body.to_string())
            }
            (false, false) => Self::Substring(body.to_string()),
        }
    }

    /// Check a single segment. The segment is lowercased here.
    pub fn matches(&self, segment: &str) -> bool {
        let segment = segment.to_lowercase();
        match self {
            Self::Exact(p) => segment == *p,
            Self::Prefix(p) => segment.starts_with(p.as_str()),
            Self::Suffix(p) => segment.ends_with(p.as_str()),
            Self::Substring(p) => !p.is_empty() && segment.contains(p.as_str()),
            Self::Glob(p) => glob_match(p, &segment),
        }
    }
}

/// Decides whether a path must be excluded from traversal or output
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    rules: Vec<IgnoreRule>,
}

impl PathFilter {
    /// Build a filter from pattern strings
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.trim().is_empty())
            .map(|p| IgnoreRule::parse(&p))
            .collect();
        Self { rules }
    }

    /// The configured rules, in order
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// True iff some segment of `path` matches some rule.
    ///
    /// Works on paths that do not exist; only the path text is inspected.
    pub fn should_ignore(&self, path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(segment) => self.segment_ignored(&segment.to_string_lossy()),
            _ => false,
        })
    }

    /// Check a single name against every rule
    pub fn segment_ignored(&self, segment: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(segment))
    }
}
