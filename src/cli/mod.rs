//! CLI module
//!
//! Command-line interface and HTTP server.
//!
//! # Commands
//!
//! - `serve` - Ingest the source and serve `/schema` and `/data`
//! - `schema` - Print the inferred schema
//! - `query` - Filter and sort rows
//! - `get` - Look up one row by id

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve};
