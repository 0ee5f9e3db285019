/*!
 * Run reports
 *
 * Summarizes a run with the tabled library: one summary table and, when any
 * file was skipped, an error table with one row per record.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::aggregate::RunOutcome;
use crate::types::Mode;
use crate::utils::format_file_size;

/// One skipped file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub path: String,
    pub reason: String,
}

/// Statistics for one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: Mode,
    /// Roots as given on the command line
    pub roots: Vec<String>,
    /// Sink name
    pub sink: String,
    /// Whether the sink accepted the text
    pub delivered: bool,
    /// Tree lines or file blocks
    pub fragments: usize,
    pub files_written: usize,
    /// Size of the blob in bytes
    pub output_bytes: usize,
    pub errors: Vec<ErrorRecord>,
    pub duration: Duration,
}

impl RunReport {
    /// Collect report data from a finished run
    pub fn from_outcome(
        outcome: &RunOutcome,
        roots: Vec<String>,
        sink: String,
        delivered: bool,
        duration: Duration,
    ) -> Self {
        Self {
            mode: outcome.mode,
            roots,
            sink,
            delivered,
            fragments: outcome.fragments,
            files_written: outcome.files_written,
            output_bytes: outcome.text.len(),
            errors: outcome
                .errors
                .iter()
                .map(|e| ErrorRecord {
                    path: e.path().display().to_string(),
                    reason: e.reason(),
                })
                .collect(),
            duration,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Render the report
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, keeping stdout for the output itself
    pub fn print_report(&self, report: &RunReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let unit = match report.mode {
            Mode::Tree => "lines",
            Mode::Flat => "files",
        };
        let count = match report.mode {
            Mode::Tree => report.fragments,
            Mode::Flat => report.files_written,
        };

        let rows = vec![
            SummaryRow {
                key: "Mode".to_string(),
                value: report.mode.to_string(),
            },
            SummaryRow {
                key: "Roots".to_string(),
                value: report.roots.join(", "),
            },
            SummaryRow {
                key: "Output".to_string(),
                value: format!("{} {}", self.format_number(count), unit),
            },
            SummaryRow {
                key: "Size".to_string(),
                value: format_file_size(report.output_bytes as u64),
            },
            SummaryRow {
                key: "Skipped".to_string(),
                value: self.format_number(report.errors.len()),
            },
            SummaryRow {
                key: "Sink".to_string(),
                value: if report.delivered {
                    report.sink.clone()
                } else {
                    format!("{} (failed)", report.sink)
                },
            },
            SummaryRow {
                key: "Elapsed".to_string(),
                value: format!("{:.4?}", report.duration),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_errors_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct ErrorRow {
            #[tabled(rename = "Path")]
            path: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows = report.errors.iter().map(|e| ErrorRow {
            path: e.path.clone(),
            reason: e.reason.clone(),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        let title = if report.delivered {
            "COPY COMPLETE"
        } else {
            "COPY FAILED"
        };
        let summary = format!("{}\n{}", title, self.create_summary_table(report));

        if report.errors.is_empty() {
            return summary;
        }

        format!(
            "SKIPPED FILES\n{}\n\n{}",
            self.create_errors_table(report),
            summary
        )
    }
}
