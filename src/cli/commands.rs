//! CLI commands and argument parsing

use crate::decode::DecoderFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Infer a typed table from untyped records and query it
#[derive(Parser, Debug)]
#[command(name = "inferdb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// URL to fetch records from (overrides the config file)
    #[arg(short, long, global = true, conflicts_with = "file")]
    pub source: Option<String>,

    /// Local file to read records from (overrides the config file)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Dot path to the record array inside a JSON body
    #[arg(long, global = true)]
    pub record_path: Option<String>,

    /// Source body format
    #[arg(long, global = true)]
    pub format: Option<DecoderFormat>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest the source and serve the HTTP API
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Re-ingest every N seconds (overrides the config file)
        #[arg(long)]
        refresh_secs: Option<u64>,
    },

    /// Print the inferred schema
    Schema,

    /// Filter and sort the ingested rows
    Query {
        /// Filter as JSON, e.g. '{"age": {"gt": 18}}'
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Field to sort by
        #[arg(short, long)]
        order_by: Option<String>,
    },

    /// Print the row with the given id
    Get {
        /// Row id
        id: String,
    },
}
