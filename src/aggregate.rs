/*!
 * Run orchestration
 *
 * Ties the walker, extractor, formatter and assembler together for one
 * invocation. Tree mode renders a listing; flat mode concatenates wrapped
 * file blocks. Per-file failures are collected, never raised.
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{FileError, RepoclipError, Result};
use crate::extractor::ContentExtractor;
use crate::rules::Rules;
use crate::scanner::Scanner;
use crate::sink::Sink;
use crate::types::Mode;
use crate::vcs::VcsTrackChecker;
use crate::writer::OutputAssembler;

/// Root marker line that opens every tree listing
pub const ROOT_MARKER: &str = ".";

/// Result of one run, kept even when the sink refuses it
#[derive(Debug)]
pub struct RunOutcome {
    /// Mode the run used
    pub mode: Mode,
    /// Assembled blob
    pub text: String,
    /// Fragments pushed: tree lines or file blocks
    pub fragments: usize,
    /// Files whose content made it into the blob (flat mode)
    pub files_written: usize,
    /// One record per skipped or failed file
    pub errors: Vec<FileError>,
}

/// Runs the aggregation over a set of roots
pub struct Aggregator<'a> {
    rules: &'a Rules,
    tracker: Option<&'a dyn VcsTrackChecker>,
}

impl<'a> Aggregator<'a> {
    pub fn new(rules: &'a Rules) -> Self {
        Self {
            rules,
            tracker: None,
        }
    }

    /// Restrict tree mode to tracked paths
    pub fn tracked_by(mut self, tracker: &'a dyn VcsTrackChecker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Run in the given mode.
    ///
    /// Fails with [`RepoclipError::EmptyResult`] when no fragment was produced,
    /// so the sink never sees an empty artifact.
    pub fn run(&self, mode: Mode, roots: &[PathBuf]) -> Result<RunOutcome> {
        info!("running {} mode over {} root(s)", mode, roots.len());
        match mode {
            Mode::Tree => Ok(self.run_tree(roots)),
            Mode::Flat => self.run_flat(roots),
        }
    }

    /// Tree listing of every root under a single `.` marker.
    ///
    /// A file root lists its parent directory. Missing roots add nothing.
    pub fn run_tree(&self, roots: &[PathBuf]) -> RunOutcome {
        let scanner = Scanner::new(self.rules, self.tracker);
        let mut out = OutputAssembler::new();
        let mut errors = Vec::new();
        out.push(ROOT_MARKER);

        for root in roots {
            let dir = if root.is_dir() {
                root.as_path()
            } else if root.is_file() {
                match root.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                }
            } else {
                debug!("tree root {} does not exist", root.display());
                continue;
            };
            scanner.render_tree(dir, &mut out, &mut errors);
        }

        RunOutcome {
            mode: Mode::Tree,
            text: out.assemble(),
            fragments: out.len(),
            files_written: 0,
            errors,
        }
    }

    /// Wrapped blocks for every file reachable from the roots, in input order
    pub fn run_flat(&self, roots: &[PathBuf]) -> Result<RunOutcome> {
        let extractor = ContentExtractor::new(&self.rules.extensions);
        let mut out = OutputAssembler::new();
        let mut errors = Vec::new();

        for file in self.flat_candidates(roots) {
            match self.wrap_one(&extractor, &file) {
                Ok(block) => out.push(block),
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e);
                }
            }
        }

        if out.is_empty() {
            return Err(RepoclipError::EmptyResult);
        }

        Ok(RunOutcome {
            mode: Mode::Flat,
            text: out.assemble(),
            fragments: out.len(),
            files_written: out.len(),
            errors,
        })
    }

    /// Files to dump, in order. Directory roots expand depth-first and sorted.
    fn flat_candidates(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let filter = &self.rules.filter;
        let mut files = Vec::new();

        for root in roots {
            if !root.is_dir() {
                let ignored = root
                    .file_name()
                    .map(|n| filter.segment_ignored(&n.to_string_lossy()))
                    .unwrap_or(false);
                if ignored {
                    debug!("ignoring {}", root.display());
                } else {
                    // Missing files stay in so they are reported
                    files.push(root.clone());
                }
                continue;
            }

            let walker = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| {
                    e.depth() == 0 || !filter.segment_ignored(&e.file_name().to_string_lossy())
                });
            for entry in walker {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                    Ok(_) => {}
                    Err(e) => warn!("Error walking {}: {}", root.display(), e),
                }
            }
        }

        files
    }

    fn wrap_one(
        &self,
        extractor: &ContentExtractor,
        path: &Path,
    ) -> std::result::Result<String, FileError> {
        let content = extractor.read_raw(path)?;

        // Label from the resolved directory, file name as given
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let dir = fs::canonicalize(parent).map_err(|source| FileError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        let labelled = match path.file_name() {
            Some(name) => dir.join(name),
            None => dir,
        };

        debug!("wrapped {} ({} bytes)", path.display(), content.len());
        Ok(self.rules.comments.wrap_file(&labelled, &content))
    }
}

/// Hand the blob to a sink. The outcome, text included, survives a failure.
pub fn deliver(outcome: &RunOutcome, sink: &dyn Sink) -> Result<()> {
    info!("delivering {} bytes to {}", outcome.text.len(), sink.name());
    sink.deliver(&outcome.text).map_err(RepoclipError::from)
}
