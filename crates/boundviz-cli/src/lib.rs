//! Command-line front end and run driver for boundviz.

pub mod cli;
pub mod config;
pub mod driver;

pub use cli::{Cli, Commands};
pub use config::{ConfigFile, RunConfig};
pub use driver::{parse_file, run, FileReport, RunSummary};
