use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(about, version, author)]
pub struct Cli {
    /// TOML file overriding the workload parameters
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}
