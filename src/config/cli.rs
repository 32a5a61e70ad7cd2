//! CLI argument parsing using clap.
//!
//! Defines the command-line interface. Retry tuning and ambient properties
//! are config-file-only; the CLI covers the options needed to run ad hoc.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// http-relay: relay messages to an HTTP resource.
///
/// Reads newline-delimited payloads from stdin, derives an HTTP request
/// from each via configurable expressions, and writes the reply payload to
/// stdout.
#[derive(Debug, Parser)]
#[command(name = "http-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Static request URL
    #[arg(long)]
    pub url: Option<String>,

    /// Expression yielding the request URL per message
    #[arg(long = "url-expr", conflicts_with = "url")]
    pub url_expr: Option<String>,

    /// HTTP method for relayed requests (default: GET)
    #[arg(long)]
    pub method: Option<String>,

    /// Static HTTP headers in 'Key=Value' or 'Key: Value' format
    /// (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Static request body (overrides any body expression)
    #[arg(long)]
    pub body: Option<String>,

    /// Expression deriving the outbound payload from the response
    #[arg(long = "reply-expr")]
    pub reply_expr: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for http-relay
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "http-relay.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the process environment.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
