use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pagefold")]
#[command(about = "Fetches a paged document and falls back to the last saved copy when offline")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Content endpoint (overrides the configuration)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Directory for the saved snapshot (overrides the configuration)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Treat the network as unavailable and serve the saved snapshot
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Delete the saved snapshot before fetching
    #[arg(long, default_value_t = false)]
    pub clear_cache: bool,

    /// Retry this many times after a failed fetch
    #[arg(short, long, default_value_t = 0)]
    pub retry: u32,
}
