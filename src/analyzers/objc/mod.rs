//! Objective-C header analysis.
//!
//! The pipeline for one unit is:
//!
//! 1. [`extractor::extract`] finds the owner and the raw prototypes
//! 2. [`selector::parse`] splits each prototype and normalizes its types
//! 3. [`encoder::encode`] renders the runtime type encoding
//!
//! Rejected prototypes are reported alongside the record and never abort the
//! unit. A unit without methods yields no record.

pub mod encoder;
pub mod extractor;
pub mod normalizer;
pub mod selector;
pub mod tables;

pub use encoder::{encode, type_code};
pub use extractor::{extract, ExtractedUnit, OwnerDeclaration, OwnerKind};
pub use normalizer::normalize;
pub use selector::parse;
pub use tables::EncodingTables;

use crate::core::{MethodDescriptor, MethodKind, TypeRecord};
use crate::errors::ParseError;
use std::collections::HashSet;
use tracing::{debug, debug_span};

/// Outcome of analyzing one unit.
#[derive(Debug, Clone, Default)]
pub struct UnitAnalysis {
    pub record: Option<TypeRecord>,
    pub rejected: Vec<ParseError>,
}

/// Turns header text into a [`TypeRecord`] using a fixed set of tables.
#[derive(Debug, Clone, Default)]
pub struct HeaderAnalyzer {
    tables: EncodingTables,
}

impl HeaderAnalyzer {
    pub fn new(tables: EncodingTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &EncodingTables {
        &self.tables
    }

    pub fn analyze(&self, text: &str) -> UnitAnalysis {
        let unit = extract(text);
        let _span = debug_span!("analyze_unit", owner = %unit.owner.name).entered();

        let mut rejected = Vec::new();
        let mut seen: HashSet<(MethodKind, String)> = HashSet::new();
        let mut methods: Vec<MethodDescriptor> = Vec::with_capacity(unit.prototypes.len());

        for prototype in &unit.prototypes {
            match parse(prototype, &unit.owner.name, &self.tables) {
                Ok(method) => {
                    if seen.insert((method.kind, method.selector.clone())) {
                        methods.push(method);
                    } else {
                        debug!(selector = %method.selector, "Dropping duplicate selector");
                    }
                }
                Err(err) => {
                    debug!(error = %err, "Skipping prototype");
                    rejected.push(err);
                }
            }
        }

        let record = (!methods.is_empty()).then(|| TypeRecord {
            name: unit.owner.name,
            superclass_name: unit.owner.superclass,
            methods,
        });

        UnitAnalysis { record, rejected }
    }
}

/// Analyze one unit with the given tables.
pub fn analyze_header(text: &str, tables: &EncodingTables) -> UnitAnalysis {
    HeaderAnalyzer::new(tables.clone()).analyze(text)
}
