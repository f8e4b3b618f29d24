//! # lexigraph-cli
//!
//! Command-line front end for Lexigraph:
//! - `map`: build a concept map and write it as an image, DOT, HTML or JSON
//! - `keywords` / `related`: inspect a single corpus node
//! - `config`: manage the TOML configuration file

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction, MapArgs, OutputFormat};
pub use config::LexigraphConfig;
