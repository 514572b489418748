pub mod output;
pub mod walker;
pub mod writers;

pub use output::{write_document, MetadataDocument, OutputFormat, OutputWriter};
pub use walker::{find_header_files, FileWalker};

use crate::errors::ExtractError;
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String, ExtractError> {
    fs::read_to_string(path).map_err(|e| ExtractError::unit_read(path, e))
}

pub fn write_file(path: &Path, content: &str) -> Result<(), ExtractError> {
    fs::write(path, content).map_err(|e| ExtractError::output(path, e))
}
