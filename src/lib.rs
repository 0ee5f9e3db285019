/*!
 * repoclip - render a repository as text for pasting elsewhere
 *
 * Two modes share one pipeline. Tree mode walks each root and renders an
 * ASCII listing with structural summaries nested under source files. Flat
 * mode wraps every file in language-appropriate comment headers and
 * concatenates the blocks. The result goes to a sink: the clipboard, stdout
 * or a file.
 */

pub mod aggregate;
pub mod clipboard;
pub mod comment;
pub mod config;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod sink;
pub mod types;
pub mod utils;
pub mod vcs;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use aggregate::{deliver, Aggregator, RunOutcome};
pub use comment::{CommentFormatter, WrappedBlock};
pub use config::{Config, SinkTarget};
pub use error::{FileError, RepoclipError, Result, SinkError};
pub use filter::PathFilter;
pub use report::{ReportFormat, Reporter, RunReport};
pub use rules::Rules;
pub use scanner::Scanner;
pub use sink::{FileSink, Sink, StdoutSink};
pub use types::{Mode, PathEntry};
pub use vcs::{GitTracker, StaticTracker, VcsTrackChecker};
pub use writer::OutputAssembler;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
