//! Error types for header extraction.
//!
//! Two layers:
//! - [`ParseError`] describes why a single method prototype was rejected.
//! - [`ExtractError`] covers everything the batch can report: unreadable
//!   units, rejected prototypes, configuration problems and output failures.
//!
//! Per-unit and per-prototype failures are recoverable: the batch records
//! them and keeps going. Only output failures end a run.
//!
//! # Error Codes
//!
//! - E001: unit could not be read
//! - E010: prototype rejected
//! - E020: configuration problem
//! - E030: output could not be written
//! - E040: directory walk failed

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    pub const UNIT_READ: ErrorCode = ErrorCode("E001");
    pub const PROTOTYPE: ErrorCode = ErrorCode("E010");
    pub const CONFIG: ErrorCode = ErrorCode("E020");
    pub const OUTPUT: ErrorCode = ErrorCode("E030");
    pub const WALK: ErrorCode = ErrorCode("E040");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a raw prototype does not match `<dir> ( <type> ) <selector>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing direction marker in `{0}`")]
    MissingDirection(String),
    #[error("missing return type in `{0}`")]
    MissingReturnType(String),
    #[error("unbalanced parentheses in `{0}`")]
    UnbalancedParens(String),
    #[error("empty selector in `{0}`")]
    EmptySelector(String),
    #[error("malformed parameter {index} in `{prototype}`")]
    MalformedParameter { prototype: String, index: usize },
}

impl ParseError {
    /// The prototype text the error refers to.
    pub fn prototype(&self) -> &str {
        match self {
            Self::MissingDirection(p)
            | Self::MissingReturnType(p)
            | Self::UnbalancedParens(p)
            | Self::EmptySelector(p) => p,
            Self::MalformedParameter { prototype, .. } => prototype,
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {}: {source}", .path.display())]
    UnitRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Prototype(#[from] ParseError),

    #[error("invalid configuration{}: {message}", location(.path))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk header directory: {0}")]
    Walk(String),
}

impl ExtractError {
    pub fn unit_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnitRead {
            path: path.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            path: None,
            message: message.into(),
        }
    }

    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            path: Some(path.into()),
            message: message.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnitRead { .. } => ErrorCode::UNIT_READ,
            Self::Prototype(_) => ErrorCode::PROTOTYPE,
            Self::Config { .. } => ErrorCode::CONFIG,
            Self::Output { .. } => ErrorCode::OUTPUT,
            Self::Walk(_) => ErrorCode::WALK,
        }
    }

    /// Whether the batch can continue past this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnitRead { .. } | Self::Prototype(_))
    }

    /// Path of the unit or file involved, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::UnitRead { path, .. } | Self::Output { path, .. } => Some(path),
            Self::Config { path, .. } => path.as_ref(),
            _ => None,
        }
    }
}
