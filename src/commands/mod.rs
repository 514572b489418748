//! CLI command implementations.
//!
//! - **extract**: convert a directory of headers into a metadata document
//! - **init**: write a default `.objcmeta.toml`

pub mod extract;
pub mod init;

pub use extract::{
    default_output_path, extract_directory, handle_extract, resolve_name, run_batch,
    sort_records, BatchOptions, BatchOutcome, ExtractConfig,
};
pub use init::init_config;
