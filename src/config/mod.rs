//! Configuration for objcmeta, read from `.objcmeta.toml`.
//!
//! Every section is optional. Missing values fall back to the built-in
//! defaults, and the `[encoding]` section only ever adds to the seeded tables.

mod core;
mod loader;

pub use core::{
    EncodingConfig, ObjcmetaConfig, OutputConfig, ScanConfig, SortKey, DEFAULT_VERSION,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
    DEFAULT_CONFIG,
};
