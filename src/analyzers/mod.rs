pub mod objc;

pub use objc::{analyze_header, HeaderAnalyzer, UnitAnalysis};

use crate::errors::ExtractError;
use std::path::{Path, PathBuf};

/// A unit that was read and analyzed.
#[derive(Debug, Clone)]
pub struct AnalyzedUnit {
    pub path: PathBuf,
    pub analysis: UnitAnalysis,
}

/// Read and analyze one unit. Read failures are returned, not raised, so the
/// caller can skip the unit and continue.
pub fn analyze_file(path: &Path, analyzer: &HeaderAnalyzer) -> Result<AnalyzedUnit, ExtractError> {
    let content = crate::io::read_file(path)?;
    Ok(AnalyzedUnit {
        path: path.to_path_buf(),
        analysis: analyzer.analyze(&content),
    })
}
