//! Argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use lexigraph::core::Scope;
use std::path::PathBuf;

/// Lexigraph - concept maps from hierarchical notes
#[derive(Parser, Debug)]
#[command(name = "lexigraph", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "LEXIGRAPH_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a concept map from a corpus
    Map(MapArgs),
    /// Print the keywords of one node
    Keywords {
        /// Corpus JSON file
        #[arg(long)]
        corpus: PathBuf,
        /// Node id
        node: String,
    },
    /// Rank nodes related to one node by its keywords
    Related {
        /// Corpus JSON file
        #[arg(long)]
        corpus: PathBuf,
        /// Node id
        node: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Corpus JSON file
    #[arg(long)]
    pub corpus: PathBuf,

    /// Comma-separated vocabulary; derived from the designated node when absent
    #[arg(long, value_delimiter = ',')]
    pub vocabulary: Vec<String>,

    /// Designated node id
    #[arg(long)]
    pub root: Option<String>,

    /// Portion of the corpus scanned relative to the designated node
    #[arg(long, default_value = "children")]
    pub scope: Scope,

    /// Map title
    #[arg(long)]
    pub title: Option<String>,

    /// Artifact to produce
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Output file; defaults to `concept-map.<ext>`
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Artifact written by `lexigraph map`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raster image through Graphviz
    Image,
    /// Graphviz DOT source
    Dot,
    /// Interactive HTML document
    Html,
    /// Map export as JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print a value by dotted key
    Get { key: String },
    /// Set a value by dotted key
    Set { key: String, value: String },
    /// Write a default config file
    Init {
        /// Target file instead of the default location
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}
