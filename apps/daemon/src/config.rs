//! Command-line configuration.
//!
//! Parsed once at startup and immutable for the process lifetime; the
//! resulting values are passed into the workers, never read from
//! globals.

use std::path::PathBuf;

use clap::Parser;

use consoletail_capture::Resource;

/// Aggregates EC2 console output into per-instance log files.
#[derive(Debug, Parser)]
#[command(name = "consoletail", version)]
pub struct Config {
    /// AWS region of the instances.
    #[arg(long, default_value = "eu-central-1")]
    pub region: String,

    /// Folder the per-instance log files are written to.
    #[arg(long, default_value = ".")]
    pub folder: PathBuf,

    /// Instance to capture; repeat for each instance.
    #[arg(long = "id", value_name = "ID[:ALIAS]", required = true)]
    pub ids: Vec<String>,
}

impl Config {
    /// Resolves the raw `id[:alias]` specs into resources.
    pub fn resources(&self) -> Vec<Resource> {
        self.ids.iter().map(|spec| Resource::parse(spec)).collect()
    }
}
