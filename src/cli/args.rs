use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "objcmeta")]
#[command(about = "Objective-C header to method metadata converter", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract method metadata from a directory of headers
    Extract {
        /// Directory containing the header units
        path: PathBuf,

        /// Framework name or bundle identifier (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Output file (defaults to <name>.extracted, or <name>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Record order (overrides the config file)
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,

        /// Configuration file (defaults to .objcmeta.toml discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long, default_value = "0", env = "OBJCMETA_JOBS")]
        jobs: usize,

        /// Process headers sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Suppress progress and summary output
        #[arg(short, long)]
        quiet: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plist,
    Json,
}

impl From<OutputFormat> for crate::io::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plist => crate::io::OutputFormat::Plist,
            OutputFormat::Json => crate::io::OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Lexicographic by header path
    Path,
    /// By class name
    Name,
}

impl From<SortOrder> for crate::config::SortKey {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Path => crate::config::SortKey::Path,
            SortOrder::Name => crate::config::SortKey::Name,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
