use crate::config::DEFAULT_VERSION;
use crate::core::TypeRecord;
use crate::io::writers::{JsonWriter, PlistWriter};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// XML property list, the `.extracted` format
    #[default]
    Plist,
    Json,
}

impl OutputFormat {
    /// Extension of the default output file.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Plist => "extracted",
            Self::Json => "json",
        }
    }
}

/// Everything a writer needs: the ordered records and the version entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument {
    pub records: Vec<TypeRecord>,
    pub version: String,
}

impl MetadataDocument {
    pub fn new(records: Vec<TypeRecord>) -> Self {
        Self {
            records,
            version: DEFAULT_VERSION.to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn method_count(&self) -> usize {
        self.records.iter().map(TypeRecord::method_count).sum()
    }
}

pub trait OutputWriter {
    fn write_document(&mut self, document: &MetadataDocument) -> anyhow::Result<()>;
}

/// Write `document` to `writer` in the given format.
pub fn write_document<W: Write>(
    format: OutputFormat,
    writer: W,
    document: &MetadataDocument,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Plist => PlistWriter::new(writer).write_document(document),
        OutputFormat::Json => JsonWriter::new(writer).write_document(document),
    }
}
