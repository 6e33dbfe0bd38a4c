mod color;

use crate::export::ExportFormat;
use crate::filter::{FilterParseError, SeverityFilter};
use clap::{Parser, Subcommand};
pub use color::ColorMode;
use std::path::PathBuf;

/// Classify log lines by keyword and severity, or follow a growing log file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file (rule table, poll interval, export settings)
    #[arg(long, global = true, env = "LOG_TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Severities to keep: "all" or a comma-separated list (e.g. "warning,error")
    #[arg(short, long, global = true, default_value = "all")]
    pub severity: String,

    /// Export matches in this format when the run ends
    #[arg(short = 'e', long, global = true, value_enum)]
    pub export: Option<ExportFormat>,

    /// Directory for exported files (overrides the config file)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Export lines without severity tags
    #[arg(long, global = true)]
    pub plain: bool,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase diagnostic output (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print matches and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a log file once and report matching lines
    Scan {
        /// Log file to scan
        file: PathBuf,

        /// Keyword to look for (repeatable or comma-separated, case-insensitive)
        #[arg(short, long = "keyword", required = true, value_delimiter = ',')]
        keywords: Vec<String>,
    },
    /// Follow a log file and report matching lines as they are appended (Ctrl+C to stop)
    Monitor {
        /// Log file to follow
        file: PathBuf,

        /// Keyword to look for (repeatable or comma-separated, case-insensitive)
        #[arg(short, long = "keyword", required = true, value_delimiter = ',')]
        keywords: Vec<String>,

        /// Poll interval in milliseconds (overrides the config file)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Show the severity rule table in priority order
    Rules,
    /// Print the active configuration as TOML
    Config {
        /// Print the built-in defaults instead of the loaded configuration
        #[arg(long)]
        default: bool,
    },
}

impl Cli {
    pub fn severity_filter(&self) -> Result<SeverityFilter, FilterParseError> {
        self.severity.parse()
    }
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
