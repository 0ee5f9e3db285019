/*!
 * Directory walking and ASCII tree rendering
 */

use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::FileError;
use crate::extractor::ContentExtractor;
use crate::rules::Rules;
use crate::types::PathEntry;
use crate::vcs::VcsTrackChecker;
use crate::writer::OutputAssembler;

/// Box-drawing characters for tree rendering
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const VERTICAL: &str = "│   ";
const SPACE: &str = "    ";

/// Walks a root, applying the ignore rules and the optional tracked-only probe
pub struct Scanner<'a> {
    rules: &'a Rules,
    tracker: Option<&'a dyn VcsTrackChecker>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner. With a tracker, only tracked paths survive.
    pub fn new(rules: &'a Rules, tracker: Option<&'a dyn VcsTrackChecker>) -> Self {
        Self { rules, tracker }
    }

    /// Depth-first list of surviving entries below `root`.
    ///
    /// A missing root yields nothing.
    pub fn walk(&self, root: &Path) -> Vec<PathEntry> {
        let mut entries = Vec::new();
        if root.exists() {
            self.walk_directory(root, 0, &mut entries);
        } else {
            debug!("skipping missing root {}", root.display());
        }
        entries
    }

    fn walk_directory(&self, dir: &Path, depth: usize, entries: &mut Vec<PathEntry>) {
        let children = self.surviving_children(dir);
        let count = children.len();

        for (i, (path, is_directory)) in children.into_iter().enumerate() {
            entries.push(PathEntry {
                path: path.clone(),
                depth,
                is_directory,
                is_last: i + 1 == count,
            });
            if is_directory {
                self.walk_directory(&path, depth + 1, entries);
            }
        }
    }

    /// Immediate children in lexicographic order, after filtering
    fn surviving_children(&self, dir: &Path) -> Vec<(PathBuf, bool)> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error reading directory {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|entry| {
                !self
                    .rules
                    .filter
                    .segment_ignored(&entry.file_name().to_string_lossy())
            })
            .map(|entry| {
                let path = entry.into_path();
                let is_directory = path.is_dir();
                (path, is_directory)
            })
            .filter(|(path, is_directory)| self.tracked(path, *is_directory))
            .collect()
    }

    fn tracked(&self, path: &Path, is_directory: bool) -> bool {
        match self.tracker {
            None => true,
            Some(tracker) if is_directory => {
                tracker.includes_directory(path, &self.rules.filter)
            }
            Some(tracker) => tracker.is_tracked(path),
        }
    }

    /// Render the tree below `root` into `out`, one fragment per line.
    ///
    /// Structural files get their summary lines nested beneath them. Read
    /// failures on those files are pushed to `errors`; the file line stays.
    pub fn render_tree(
        &self,
        root: &Path,
        out: &mut OutputAssembler,
        errors: &mut Vec<FileError>,
    ) {
        let extractor = ContentExtractor::new(&self.rules.extensions);
        // Whether each open ancestor was the last child at its depth
        let mut ancestors_last: Vec<bool> = Vec::new();

        for entry in self.walk(root) {
            ancestors_last.truncate(entry.depth);
            let prefix: String = ancestors_last
                .iter()
                .map(|&last| if last { SPACE } else { VERTICAL })
                .collect();
            let marker = if entry.is_last { LAST_BRANCH } else { BRANCH };
            out.push(format!("{}{}{}", prefix, marker, entry.name()));

            ancestors_last.push(entry.is_last);
            if entry.is_directory {
                continue;
            }

            let Some(kind) = extractor.structural_kind(&entry.path) else {
                continue;
            };
            match extractor.structural(&entry.path, kind) {
                Ok(lines) => {
                    let child_prefix = format!(
                        "{}{}",
                        prefix,
                        if entry.is_last { SPACE } else { VERTICAL }
                    );
                    push_nested(out, &child_prefix, &lines);
                }
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e);
                }
            }
        }
    }
}

/// Lines under a node, with the same last-marker convention
fn push_nested(out: &mut OutputAssembler, prefix: &str, lines: &[String]) {
    let count = lines.len();
    for (i, line) in lines.iter().enumerate() {
        let marker = if i + 1 == count { LAST_BRANCH } else { BRANCH };
        out.push(format!("{}{}{}", prefix, marker, line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::StaticTracker;
    use std::fs;
    use tempfile::tempdir;

    fn render(root: &Path, rules: &Rules, tracker: Option<&dyn VcsTrackChecker>) -> String {
        let mut out = OutputAssembler::new();
        let mut errors = Vec::new();
        Scanner::new(rules, tracker).render_tree(root, &mut out, &mut errors);
        assert!(errors.is_empty(), "{:?}", errors);
        out.assemble()
    }

    #[test]
    fn test_walk_sorted_with_last_markers() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b_dir")).unwrap();
        fs::write(dir.path().join("b_dir/inner.md"), "").unwrap();
        fs::write(dir.path().join("c.md"), "").unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();

        let rules = Rules::default();
        let entries = Scanner::new(&rules, None).walk(dir.path());
        let names: Vec<_> = entries.iter().map(|e| (e.name(), e.depth, e.is_last)).collect();
        assert_eq!(
            names,
            vec![
                ("a.md".to_string(), 0, false),
                ("b_dir".to_string(), 0, false),
                ("inner.md".to_string(), 1, true),
                ("c.md".to_string(), 0, true),
            ]
        );
    }

    #[test]
    fn test_exactly_one_last_per_level() {
        let dir = tempdir().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            fs::create_dir_all(dir.path().join(name)).unwrap();
            for file in ["x.txt", "a.txt", "venv"] {
                fs::write(dir.path().join(name).join(file), "").unwrap();
            }
        }

        let rules = Rules::default();
        let entries = Scanner::new(&rules, None).walk(dir.path());

        let top: Vec<_> = entries.iter().filter(|e| e.depth == 0).collect();
        assert_eq!(top.iter().filter(|e| e.is_last).count(), 1);
        assert_eq!(top.last().unwrap().name(), "zeta");
        assert!(top.last().unwrap().is_last);

        for parent in ["alpha", "mid", "zeta"] {
            let kids: Vec<_> = entries
                .iter()
                .filter(|e| e.path.parent() == Some(dir.path().join(parent).as_path()))
                .collect();
            assert_eq!(kids.len(), 2, "venv is filtered");
            assert_eq!(kids.iter().filter(|e| e.is_last).count(), 1);
            assert_eq!(kids[1].name(), "x.txt");
            assert!(kids[1].is_last);
        }
    }

    #[test]
    fn test_render_prefixes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg/sub")).unwrap();
        fs::write(dir.path().join("pkg/sub/deep.md"), "").unwrap();
        fs::write(dir.path().join("pkg/z.md"), "").unwrap();
        fs::write(dir.path().join("top.md"), "").unwrap();

        let rules = Rules::default();
        let output = render(dir.path(), &rules, None);
        assert_eq!(
            output,
            [
                "├── pkg",
                "│   ├── sub",
                "│   │   └── deep.md",
                "│   └── z.md",
                "└── top.md",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_structural_lines_nested() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.py"), "class A:\n    def run(self):\n        pass\n").unwrap();
        fs::write(dir.path().join("requirements.txt"), "flask\n\npytest\n").unwrap();

        let rules = Rules::default();
        let output = render(dir.path(), &rules, None);
        assert_eq!(
            output,
            [
                "├── app.py",
                "│   ├── class A",
                "│   └── def run",
                "└── requirements.txt",
                "    ├── flask",
                "    └── pytest",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_tracked_only() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("src/lib.md"), "").unwrap();
        fs::write(dir.path().join("build/out.md"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let tracker = StaticTracker::new([
            dir.path().join("src/lib.md"),
            dir.path().join("README.md"),
        ]);
        let rules = Rules::default();
        let output = render(dir.path(), &rules, Some(&tracker));
        assert_eq!(
            output,
            ["├── README.md", "└── src", "    └── lib.md"].join("\n")
        );
    }

    #[test]
    fn test_tracked_only_skips_dirs_with_only_ignored_content() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg/__pycache__")).unwrap();
        fs::write(dir.path().join("pkg/__pycache__/x.pyc"), "").unwrap();
        fs::write(dir.path().join("main.md"), "").unwrap();

        let tracker = StaticTracker::new([
            dir.path().join("pkg/__pycache__/x.pyc"),
            dir.path().join("main.md"),
        ]);
        let rules = Rules::default();
        assert_eq!(render(dir.path(), &rules, Some(&tracker)), "└── main.md");
    }

    #[test]
    fn test_missing_root_is_silent() {
        let rules = Rules::default();
        assert!(Scanner::new(&rules, None)
            .walk(Path::new("/no/such/root/here"))
            .is_empty());
    }

    #[test]
    fn test_unreadable_structural_file_keeps_line() {
        let dir = tempdir().unwrap();
        // invalid UTF-8 fails read_to_string
        fs::write(dir.path().join("bad.py"), [0xffu8, 0xfe, 0x00]).unwrap();

        let rules = Rules::default();
        let mut out = OutputAssembler::new();
        let mut errors = Vec::new();
        Scanner::new(&rules, None).render_tree(dir.path(), &mut out, &mut errors);

        assert_eq!(out.assemble(), "└── bad.py");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], FileError::ReadFailure { .. }));
    }
}
