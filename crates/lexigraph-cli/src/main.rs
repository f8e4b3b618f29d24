//! Lexigraph CLI
//!
//! Builds concept maps from hierarchical notes and writes them as images,
//! DOT, interactive HTML or JSON.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use lexigraph_cli::config_handlers::handle_config_command;
use lexigraph_cli::{commands, Cli, Command, LexigraphConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Config { action } => {
            init_tracing(cli.verbose, "warn");
            handle_config_command(config_path, action)?;
        }
        command => {
            let config = LexigraphConfig::load(config_path)?;
            init_tracing(cli.verbose, &config.log_level);
            tracing::debug!(?config_path, "configuration loaded");
            run(&config, config_path, command)?;
        }
    }
    Ok(())
}

fn run(config: &LexigraphConfig, config_path: Option<&str>, command: Command) -> Result<()> {
    match command {
        Command::Map(args) => {
            let (summary, out) = commands::run_map(config, &args)?;
            println!(
                "{}: {} concepts ({} major, {} detail), {} edges{} -> {}",
                summary.title,
                summary.concepts,
                summary.majors,
                summary.details,
                summary.edges,
                if summary.truncated { ", truncated" } else { "" },
                out.display()
            );
        }
        Command::Keywords { corpus, node } => {
            for keyword in commands::run_keywords(config, &corpus, &node)? {
                println!("{keyword}");
            }
        }
        Command::Related { corpus, node, limit } => {
            for (id, name, score, matched) in commands::run_related(config, &corpus, &node, limit)? {
                println!("{score:>4}  {id}  {name}  [{}]", matched.join(", "));
            }
        }
        Command::Config { action } => handle_config_command(config_path, action)?,
    }
    Ok(())
}
