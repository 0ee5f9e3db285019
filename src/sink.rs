/*!
 * Destinations for the assembled text
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::SinkError;

/// Receives the final blob of a run
pub trait Sink {
    /// Short human-readable name for reports
    fn name(&self) -> String;

    /// Hand over the text. A failure here is terminal for the run.
    fn deliver(&self, text: &str) -> Result<(), SinkError>;
}

/// Writes to standard output with a trailing newline
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn name(&self) -> String {
        "stdout".to_string()
    }

    fn deliver(&self, text: &str) -> Result<(), SinkError> {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }
}

/// Writes (truncating) to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Sink for FileSink {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn deliver(&self, text: &str) -> Result<(), SinkError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
