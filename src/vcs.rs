/*!
 * Version-control tracking probe
 *
 * The tree walker only needs one question answered: is this path tracked?
 * `GitTracker` asks the `git` binary; `StaticTracker` answers from a fixed set
 * and is what the walker tests use.
 */

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, trace};
use walkdir::WalkDir;

use crate::filter::PathFilter;

/// Answers whether a path is under version control.
///
/// Probe failures of any kind are "not tracked".
pub trait VcsTrackChecker {
    fn is_tracked(&self, path: &Path) -> bool;

    /// A directory is included when it, or anything beneath it that the
    /// filter keeps, is tracked
    fn includes_directory(&self, dir: &Path, filter: &PathFilter) -> bool {
        if self.is_tracked(dir) {
            return true;
        }
        WalkDir::new(dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !filter.segment_ignored(&entry.file_name().to_string_lossy())
            })
            .filter_map(Result::ok)
            .any(|entry| self.is_tracked(entry.path()))
    }
}

/// Probes with `git ls-files --error-unmatch <name>`, run from the path's
/// parent.
///
/// Answers are memoized for the lifetime of the tracker; create one per run.
#[derive(Debug, Default)]
pub struct GitTracker {
    cache: RefCell<HashMap<PathBuf, bool>>,
}

impl GitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn probe(path: &Path) -> bool {
        if !path.exists() {
            return false;
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        // The pathspec is relative to the parent we run in
        let pathspec = path.file_name().map(Path::new).unwrap_or(path);

        let status = Command::new("git")
            .args(["ls-files", "--error-unmatch"])
            .arg(pathspec)
            .current_dir(parent)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("git probe failed for {}: {}", path.display(), e);
                false
            }
        }
    }
}

impl VcsTrackChecker for GitTracker {
    fn is_tracked(&self, path: &Path) -> bool {
        if let Some(&known) = self.cache.borrow().get(path) {
            return known;
        }
        let tracked = Self::probe(path);
        trace!("tracked({}) = {}", path.display(), tracked);
        self.cache.borrow_mut().insert(path.to_path_buf(), tracked);
        tracked
    }
}

/// In-memory tracker: exactly the listed paths are tracked
#[derive(Debug, Clone, Default)]
pub struct StaticTracker {
    tracked: HashSet<PathBuf>,
}

impl StaticTracker {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            tracked: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl VcsTrackChecker for StaticTracker {
    fn is_tracked(&self, path: &Path) -> bool {
        self.tracked.contains(path)
    }
}
