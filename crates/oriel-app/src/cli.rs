use std::path::PathBuf;

use clap::Parser;

/// oriel — embed a browser view in a native window with an RPC bridge.
#[derive(Parser, Debug)]
#[command(name = "oriel", version, about)]
pub struct Args {
    /// URL to open instead of the bundled demo page.
    #[arg(short, long)]
    pub url: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Browser profile data directory.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Enable devtools regardless of build profile.
    #[arg(long)]
    pub devtools: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
