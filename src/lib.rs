pub mod classifier;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod monitor;
pub mod scanner;
pub mod severity;

use crate::config::TriageConfig;
use crate::display::{ConsoleSink, format_record, format_rule_table, format_summary};
use crate::export::{ExportSource, write_export};
use anyhow::Context;
pub use classifier::{RuleTable, SeverityRule, classify};
pub use cli::{Cli, ColorMode, Commands, cli_parse};
pub use error::TriageError;
pub use export::{ExportFormat, ExportOptions};
pub use filter::{KeywordFilter, SeverityFilter};
pub use monitor::{MatchSink, MonitorOptions, monitor_file};
pub use scanner::{LineMatcher, LogRecord, MatchSet, scan_file};
pub use severity::Severity;
use std::path::Path;
use std::time::Duration;

/// Export `matches` if an export format was requested
fn export_if_requested(
    matches: &MatchSet,
    file: &Path,
    keywords: &KeywordFilter,
    cli: &Cli,
    config: &TriageConfig,
) -> anyhow::Result<()> {
    let Some(format) = cli.export else {
        return Ok(());
    };

    let mut options = config.export_options(format).tagged(!cli.plain);
    if let Some(dir) = &cli.output_dir {
        options.output_dir = dir.clone();
    }

    let source = ExportSource {
        path: file,
        keywords: keywords.keywords(),
    };

    match write_export(matches, source, &options).map_err(TriageError::from)? {
        Some(path) => {
            if !cli.quiet {
                eprintln!("Exported {} entries to {}", matches.len(), path.display());
            }
        }
        None => {
            if !cli.quiet {
                eprintln!("Nothing to export.");
            }
        }
    }

    Ok(())
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl+C; monitor will run until killed");
        std::future::pending::<()>().await;
    }
    tracing::debug!("Ctrl+C received");
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    cli.color.apply();
    logging::init(cli.debug, cli.verbose, cli.quiet);

    let config = config::load_config(cli.config.as_deref())?;

    if cli.verbose > 0 && !cli.quiet {
        eprintln!("Severity filter: {}", cli.severity);
        if let Some(config_path) = &cli.config {
            eprintln!("Config file: {}", config_path.display());
        }
        if let Some(format) = cli.export {
            eprintln!("Export format: {format}");
        }
    }

    match &cli.command {
        Commands::Scan { file, keywords } => {
            let keywords = KeywordFilter::new(keywords).map_err(TriageError::from)?;
            let severities = cli.severity_filter().map_err(TriageError::from)?;
            let rules = config.rule_table()?;

            let matches = scan_file(file, &rules, &keywords, &severities)?;

            for record in &matches {
                println!("{}", format_record(record));
            }
            if !cli.quiet {
                print!("{}", format_summary(&matches));
            }

            export_if_requested(&matches, file, &keywords, &cli, &config)?;
        }
        Commands::Monitor {
            file,
            keywords,
            interval_ms,
        } => {
            let keywords = KeywordFilter::new(keywords).map_err(TriageError::from)?;
            let severities = cli.severity_filter().map_err(TriageError::from)?;
            let rules = config.rule_table()?;
            let mut options = config.monitor_options()?;
            if let Some(ms) = interval_ms {
                anyhow::ensure!(*ms > 0, "--interval-ms must be greater than zero");
                options = options.poll_interval(Duration::from_millis(*ms));
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;

            if !cli.quiet {
                eprintln!(
                    "Monitoring {} for: {} (Ctrl+C to stop)",
                    file.display(),
                    keywords.keywords().join(", ")
                );
                if !severities.is_all() {
                    eprintln!("Only reporting: {severities}");
                }
            }

            let matcher = LineMatcher::new(&rules, &keywords, &severities);
            let matches = runtime.block_on(monitor_file(
                file,
                matcher,
                options,
                &mut ConsoleSink,
                wait_for_ctrl_c(),
            ))?;

            if !cli.quiet {
                eprintln!("\nMonitoring stopped.");
                print!("{}", format_summary(&matches));
            }

            export_if_requested(&matches, file, &keywords, &cli, &config)?;
        }
        Commands::Rules => {
            let rules = config.rule_table()?;
            print!("{}", format_rule_table(&rules));
        }
        Commands::Config { default } => {
            let shown = if *default {
                config::default_config()
            } else {
                &config
            };
            let body = shown
                .to_toml()
                .context("Failed to serialize configuration")?;
            print!("{body}");
        }
    }

    Ok(())
}
