use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for benchdash
#[derive(Parser, Debug)]
#[command(version, about = "benchdash")]
pub struct Args {
    /// Benchmark runs file (JSON array of run records)
    pub path: PathBuf,

    /// Dashboards file to edit (defaults to dashboards.json next to the runs file)
    #[arg(long = "dashboards")]
    pub dashboards: Option<PathBuf>,

    /// Dashboard name to edit; selected or created by name.
    /// Without this, the first dashboard in the file is edited.
    #[arg(long = "dashboard")]
    pub dashboard: Option<String>,

    /// Debounce interval in milliseconds for criteria-triggered timeline queries
    #[arg(long = "update-interval")]
    pub update_interval: Option<u64>,

    /// Maximum number of matching runs reported by a timeline query
    #[arg(long = "bench-limit")]
    pub bench_limit: Option<u64>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Clear all cache data and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,
}
