//! Command-line interface: argument parsing (`args`) and runtime setup (`setup`).

pub mod args;
pub mod setup;

pub use args::{Cli, Commands, OutputFormat, SortOrder};
pub use setup::{configure_thread_pool, get_worker_count, init_logging, verbosity_filter};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
