pub mod types;

pub use types::{BlockShape, IntegerWidth, Pointee, SemanticType};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base of the argument area: receiver at 0, selector at 8.
pub const FRAME_BASE: usize = 16;

/// Every argument occupies one slot of this size on the modeled ABI.
pub const SLOT_SIZE: usize = 8;

/// Direction marker of a method: `-` for instance methods, `+` for class methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Instance,
    Class,
}

impl MethodKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '-' => Some(Self::Instance),
            '+' => Some(Self::Class),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Instance => "-",
            Self::Class => "+",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Selector segment preceding the colon; `None` for anonymous segments
    pub label: Option<String>,
    pub ty: SemanticType,
    /// Normalized spelling used in the display name
    pub spelling: String,
    pub index: usize,
}

impl ParameterDescriptor {
    pub fn new(label: Option<String>, ty: SemanticType, spelling: String, index: usize) -> Self {
        Self {
            label,
            ty,
            spelling,
            index,
        }
    }

    pub fn stack_offset(&self) -> usize {
        stack_offset(self.index)
    }
}

/// Offset of the parameter at `index`, counting after the two implicit arguments.
pub fn stack_offset(index: usize) -> usize {
    FRAME_BASE + SLOT_SIZE * index
}

/// Total frame size for a method taking `parameter_count` explicit arguments.
pub fn frame_size(parameter_count: usize) -> usize {
    FRAME_BASE + SLOT_SIZE * parameter_count
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub kind: MethodKind,
    pub selector: String,
    pub display_name: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: SemanticType,
    pub return_spelling: String,
    pub encoding: String,
    pub class_name: String,
}

impl MethodDescriptor {
    /// Identity within an owner: direction plus selector.
    pub fn key(&self) -> (MethodKind, &str) {
        (self.kind, self.selector.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub name: String,
    pub superclass_name: Option<String>,
    pub methods: Vec<MethodDescriptor>,
}

impl TypeRecord {
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}
