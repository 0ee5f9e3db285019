/*!
 * Command-line interface for repoclip
 */

use std::io;
use std::process;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, warn};

use repoclip::aggregate::{deliver, Aggregator};
use repoclip::config::{Args, Config, SinkTarget};
use repoclip::error::{exit_code, Result};
use repoclip::report::{ReportFormat, Reporter, RunReport};
use repoclip::sink::{Sink, StdoutSink};
use repoclip::vcs::GitTracker;

fn main() {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return;
    }

    let config = Config::from_args(args);
    setup_logging(&config);

    let code = match run(&config) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            exit_code(&e)
        }
    };
    debug!("Exiting with code {}", code);
    process::exit(code);
}

fn setup_logging(config: &Config) {
    // RUST_LOG, when set, wins over -v
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn spinner(config: &Config) -> ProgressBar {
    if config.quiet || config.sink == SinkTarget::Stdout {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new_spinner();
    let template = "{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;
    let rules = config.load_rules()?;

    let progress = spinner(config);
    progress.set_prefix(config.mode.to_string());
    progress.set_message(format!("Scanning {} root(s)", config.roots.len()));

    let start_time = Instant::now();

    // One tracker per run so its cache never outlives the run
    let tracker = GitTracker::new();
    let mut aggregator = Aggregator::new(&rules);
    if config.tracked_only {
        aggregator = aggregator.tracked_by(&tracker);
    }
    let outcome = aggregator.run(config.mode, &config.roots);
    progress.finish_and_clear();
    let outcome = outcome?;

    let sink = config.sink();
    let delivered = deliver(&outcome, sink.as_ref());

    if !config.quiet {
        let report = RunReport::from_outcome(
            &outcome,
            config.roots.iter().map(|p| p.display().to_string()).collect(),
            sink.name(),
            delivered.is_ok(),
            start_time.elapsed(),
        );
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    if let Err(e) = delivered {
        // Do not lose the text when the clipboard or file refused it
        if config.sink != SinkTarget::Stdout {
            warn!("{}; writing output to stdout instead", e);
            if let Err(fallback) = StdoutSink.deliver(&outcome.text) {
                warn!("stdout fallback failed: {}", fallback);
            }
        }
        return Err(e);
    }

    Ok(())
}
