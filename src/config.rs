/*!
 * Configuration handling for repoclip
 */

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use clap_complete::Shell;
use log::{debug, warn, LevelFilter};

use crate::clipboard::ClipboardSink;
use crate::error::{RepoclipError, Result};
use crate::rules::{RuleFile, Rules};
use crate::sink::{FileSink, Sink, StdoutSink};
use crate::types::Mode;
use crate::{bail, ensure};

/// Name of the optional rule file under the user config directory
pub const RULES_FILE_NAME: &str = "rules.json";

/// Command-line arguments for repoclip
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "repoclip",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy a repository as a tree listing or a commented file dump",
    long_about = "Walks one or more paths and renders either an ASCII tree with \
                  structural summaries or every file wrapped in comment headers, \
                  then hands the text to the clipboard, stdout or a file."
)]
pub struct Args {
    /// Files or directories to process
    #[clap(default_value = ".")]
    pub paths: Vec<String>,

    /// Output mode
    #[clap(long, value_enum, default_value_t = Mode::default())]
    pub mode: Mode,

    /// Only list paths tracked by git (tree mode)
    #[clap(long)]
    pub tracked_only: bool,

    /// Comma-separated ignore patterns, added to the defaults
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Start from an empty ignore list
    #[clap(long)]
    pub no_default_ignores: bool,

    /// JSON rule file overriding the built-in tables
    #[clap(long, value_name = "FILE")]
    pub rules: Option<String>,

    /// Write the output to a file instead of the clipboard
    #[clap(long, short, value_name = "FILE")]
    pub output: Option<String>,

    /// Print the output to stdout instead of the clipboard
    #[clap(long, conflicts_with = "output")]
    pub stdout: bool,

    /// No spinner and no report
    #[clap(long, short)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Where the final text goes
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SinkTarget {
    Clipboard,
    Stdout,
    File(PathBuf),
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Roots in the order given
    pub roots: Vec<PathBuf>,

    pub mode: Mode,

    /// Tree mode only
    pub tracked_only: bool,

    /// Extra ignore patterns
    pub ignore_patterns: Vec<String>,

    /// Whether the built-in ignore list applies
    pub default_ignores: bool,

    /// Explicit rule file, if any
    pub rules_file: Option<PathBuf>,

    pub sink: SinkTarget,

    pub quiet: bool,

    pub verbosity: u8,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let sink = match (args.output, args.stdout) {
            (Some(path), _) => SinkTarget::File(PathBuf::from(path)),
            (None, true) => SinkTarget::Stdout,
            (None, false) => SinkTarget::Clipboard,
        };

        Self {
            roots: args.paths.into_iter().map(PathBuf::from).collect(),
            mode: args.mode,
            tracked_only: args.tracked_only,
            ignore_patterns: args.ignore,
            default_ignores: !args.no_default_ignores,
            rules_file: args.rules.map(PathBuf::from),
            sink,
            quiet: args.quiet,
            verbosity: args.verbose,
        }
    }

    /// Roots that do not exist
    pub fn missing_roots(&self) -> Vec<&Path> {
        self.roots
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| !p.exists())
            .collect()
    }

    /// Validate the configuration.
    ///
    /// Missing roots are logged one by one; only a run with no existing root
    /// is rejected.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.tracked_only || self.mode == Mode::Tree,
            Config,
            "--tracked-only requires --mode tree"
        );

        let missing = self.missing_roots();
        for root in &missing {
            warn!("Path not found: {}", root.display());
        }
        if !self.roots.is_empty() && missing.len() == self.roots.len() {
            let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
            return Err(RepoclipError::PathNotFound(names.join(", ")));
        }

        if let SinkTarget::File(path) = &self.sink {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    bail!(Config, "Output directory not found: {}", parent.display());
                }
            }
        }

        if let Some(path) = &self.rules_file {
            ensure!(path.is_file(), Config, "Rule file not found: {}", path.display());
        }

        Ok(())
    }

    /// Explicit `--rules`, else the user rule file when it exists
    pub fn rule_file_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.rules_file {
            return Some(path.clone());
        }
        let path = dirs::config_dir()?.join("repoclip").join(RULES_FILE_NAME);
        path.is_file().then_some(path)
    }

    /// Build the immutable tables for this run
    pub fn load_rules(&self) -> Result<Rules> {
        let file = match self.rule_file_path() {
            Some(path) => {
                debug!("loading rules from {}", path.display());
                Some(RuleFile::load(&path)?)
            }
            None => None,
        };
        Ok(Rules::build(file, &self.ignore_patterns, self.default_ignores))
    }

    /// Sink for the configured target
    pub fn sink(&self) -> Box<dyn Sink> {
        match &self.sink {
            SinkTarget::Clipboard => Box::new(ClipboardSink::detect()),
            SinkTarget::Stdout => Box::new(StdoutSink),
            SinkTarget::File(path) => Box::new(FileSink::new(path)),
        }
    }

    /// Log level from the number of `-v` flags
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
