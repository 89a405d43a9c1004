//! Command-line argument definitions for the Structogram CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the program name and logging verbosity.

use std::path::PathBuf;

use clap::Parser;

/// Convert GOLD Parser parse tree exports to Structorizer diagrams
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Parse tree exports to convert. Reads standard input when empty.
    #[arg(help = "Paths to the input files")]
    pub inputs: Vec<PathBuf>,

    /// Output file, or output directory when several inputs are given.
    /// Writes to standard output when omitted for a single input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Program name written into the diagram, overriding the configuration
    #[arg(long)]
    pub name: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
