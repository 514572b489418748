// Test utility module for objcmeta integration tests
#![allow(dead_code)]

use objcmeta::{EncodingTables, HeaderAnalyzer, MethodDescriptor, TypeRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Analyze one header with the default tables.
pub fn analyze(text: &str) -> Option<TypeRecord> {
    HeaderAnalyzer::new(EncodingTables::default())
        .analyze(text)
        .record
}

/// The single method declared in `prototype`, wrapped in a class `Foo : NSObject`.
pub fn method(prototype: &str) -> MethodDescriptor {
    let header = format!("@interface Foo : NSObject\n{}\n@end\n", prototype);
    let record = analyze(&header).expect("expected a record");
    assert_eq!(record.methods.len(), 1, "expected exactly one method");
    record.methods.into_iter().next().unwrap()
}

/// Directory of header units for batch tests.
pub struct HeaderFixture {
    pub dir: TempDir,
}

impl HeaderFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn with_header(self, relative: &str, content: &str) -> Self {
        self.write(relative, content.as_bytes());
        self
    }

    pub fn with_bytes(self, relative: &str, content: &[u8]) -> Self {
        self.write(relative, content);
        self
    }

    fn write(&self, relative: &str, content: &[u8]) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}
