// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod observability;

// Re-export commonly used types
pub use crate::core::{
    BlockShape, IntegerWidth, MethodDescriptor, MethodKind, ParameterDescriptor, Pointee,
    SemanticType, TypeRecord,
};

pub use crate::analyzers::objc::{
    encode, extract, normalize, parse, EncodingTables, ExtractedUnit, OwnerDeclaration, OwnerKind,
};
pub use crate::analyzers::{analyze_file, analyze_header, AnalyzedUnit, HeaderAnalyzer, UnitAnalysis};

pub use crate::commands::{extract_directory, run_batch, BatchOptions, BatchOutcome};
pub use crate::config::{load_config, ObjcmetaConfig, SortKey};
pub use crate::errors::{ErrorCode, ExtractError, ParseError};
pub use crate::io::output::{write_document, MetadataDocument, OutputFormat, OutputWriter};
