//! Command-line argument definitions for the Ontograph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the output format and logging verbosity.

use clap::Parser;

use ontograph::ontology::OutputFormat;

/// Command-line arguments for the Ontograph translator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram document (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format (turtle, ntriples, functional), overriding the configuration
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write the diagram graph instead of the ontology
    #[arg(long)]
    pub graph: bool,

    /// Write the diagram graph as Graphviz DOT
    #[cfg(feature = "graphviz")]
    #[arg(long, conflicts_with = "graph")]
    pub dot: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
