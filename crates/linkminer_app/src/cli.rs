//! Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::platform::logging::LogDestination;

/// Terminal client for the job-listing scraper backend.
///
/// Type a query and press Enter to start a scrape; `:cancel` abandons the
/// running request and `:quit` (or end of input) exits. Records pushed by
/// the backend are appended to the table as they arrive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Backend host serving both /run and the push channel
    #[arg(short, long, env = "LINKMINER_BACKEND")]
    pub backend: Option<String>,

    /// Optional path to a RON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Give up on a scrape request after this many seconds (no deadline by default)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}
