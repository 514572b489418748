//! Semantic type tags shared by the normalizer and the encoder

use serde::{Deserialize, Serialize};

/// Width of an integer type as it is spelled in a declaration.
///
/// `Long` and `LongLong` both encode as 64-bit quantities on the modeled ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegerWidth {
    Char,
    Short,
    Int,
    Long,
    LongLong,
}

/// Classification of a block type by the block's own argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockShape {
    /// `void (^)(void)` and `dispatch_block_t`
    NoArgument,
    /// A single boolean argument
    BoolArgument,
    /// A single object argument
    ObjectArgument,
    /// Unreadable argument list whose block returns a boolean
    BoolResult,
    /// The opaque alias `CDUnknownBlockType`
    Opaque,
    /// Anything else
    Generic,
}

/// What a pointer-to-pointer points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pointee {
    /// Out-parameter style `NSError **` / `id *`
    Object,
    /// Any other double indirection
    Pointer,
}

/// Closed set of semantic type tags a raw spelling normalizes into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    Void,
    Boolean,
    Integer { signed: bool, width: IntegerWidth },
    Floating,
    Double,
    ObjectPointer { is_const: bool },
    ClassMeta,
    SelectorMeta,
    ProtocolMeta,
    CString { is_const: bool },
    GenericPointer { is_const: bool },
    FunctionPointer,
    PointerToPointer { is_const: bool, pointee: Pointee },
    Struct { name: String, layout: String },
    Block(BlockShape),
    UnknownObject,
}

impl SemanticType {
    pub const fn signed(width: IntegerWidth) -> Self {
        Self::Integer {
            signed: true,
            width,
        }
    }

    pub const fn unsigned(width: IntegerWidth) -> Self {
        Self::Integer {
            signed: false,
            width,
        }
    }

    pub const fn object() -> Self {
        Self::ObjectPointer { is_const: false }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    /// Whether the tag carries a read-only qualifier.
    pub fn is_const(&self) -> bool {
        match self {
            Self::ObjectPointer { is_const }
            | Self::CString { is_const }
            | Self::GenericPointer { is_const }
            | Self::PointerToPointer { is_const, .. } => *is_const,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_flag_only_on_pointer_tags() {
        assert!(SemanticType::CString { is_const: true }.is_const());
        assert!(SemanticType::PointerToPointer {
            is_const: true,
            pointee: Pointee::Object
        }
        .is_const());
        assert!(!SemanticType::object().is_const());
        assert!(!SemanticType::Boolean.is_const());
    }

    #[test]
    fn test_block_detection() {
        assert!(SemanticType::Block(BlockShape::Generic).is_block());
        assert!(!SemanticType::UnknownObject.is_block());
    }
}
