//! Runtime type encoding synthesis.
//!
//! Produces strings of the form `<ret><frame>@0:8<arg0>16<arg1>24...`: the
//! return type code, the total frame size, the implicit receiver and selector
//! at offsets 0 and 8, then every explicit argument at `16 + 8 * index`.
//!
//! Two shortcuts bypass the computation:
//! - selectors in the override table return the table's literal encoding;
//! - argument-less methods returning a block use a fixed shape chosen by the
//!   block's own arity.

use super::tables::EncodingTables;
use crate::core::{
    frame_size, stack_offset, BlockShape, IntegerWidth, MethodKind, Pointee, SemanticType,
};

/// Encoding of the compiler-synthesized `.cxx_destruct` method.
pub const CXX_DESTRUCT_ENCODING: &str = "v16@0:8";

/// Code for a block reference passed as an argument.
const BLOCK_CODE: &str = "@?";

/// Encode a method. Deterministic and total over the semantic type domain.
pub fn encode(
    kind: MethodKind,
    selector: &str,
    return_type: &SemanticType,
    parameters: &[SemanticType],
    tables: &EncodingTables,
) -> String {
    if let Some(fixed) = tables.override_for(kind, selector) {
        return fixed.to_string();
    }

    if parameters.is_empty() {
        if let SemanticType::Block(shape) = return_type {
            return block_return_shape(*shape).to_string();
        }
    }

    let mut encoding = String::with_capacity(16 + parameters.len() * 4);
    encoding.push_str(&type_code(return_type));
    encoding.push_str(&frame_size(parameters.len()).to_string());
    encoding.push_str("@0:8");

    for (index, parameter) in parameters.iter().enumerate() {
        encoding.push_str(&type_code(parameter));
        encoding.push_str(&stack_offset(index).to_string());
    }

    encoding
}

/// Fixed encodings for argument-less methods whose return value is a block;
/// the block occupies the slots at 16 and 24.
pub fn block_return_shape(shape: BlockShape) -> &'static str {
    match shape {
        BlockShape::NoArgument => "v24@0:8@?16",
        BlockShape::BoolArgument => "v32@0:8@?16@24",
        BlockShape::ObjectArgument => "v32@0:8@?16@24",
        BlockShape::Opaque => "v32@0:8@?16@24",
        BlockShape::BoolResult => "B32@0:8@?16@24",
        BlockShape::Generic => "@32@0:8@?16@24",
    }
}

/// Type code for a semantic type in return or argument position.
pub fn type_code(ty: &SemanticType) -> String {
    let code: &str = match ty {
        SemanticType::Void => "v",
        SemanticType::Boolean => "B",
        SemanticType::Integer { signed, width } => integer_code(*signed, *width),
        SemanticType::Floating => "f",
        SemanticType::Double => "d",
        SemanticType::ObjectPointer { .. } | SemanticType::UnknownObject => "@",
        SemanticType::ClassMeta => "#",
        SemanticType::SelectorMeta => ":",
        SemanticType::ProtocolMeta => "^#",
        SemanticType::CString { .. } => "*",
        SemanticType::GenericPointer { .. } => "^",
        SemanticType::FunctionPointer => "^?",
        SemanticType::PointerToPointer { pointee, .. } => match pointee {
            Pointee::Object => "^@",
            Pointee::Pointer => "^^",
        },
        SemanticType::Struct { layout, .. } => layout.as_str(),
        SemanticType::Block(_) => BLOCK_CODE,
    };

    if ty.is_const() {
        format!("r{code}")
    } else {
        code.to_string()
    }
}

fn integer_code(signed: bool, width: IntegerWidth) -> &'static str {
    match (signed, width) {
        (true, IntegerWidth::Char) => "c",
        (true, IntegerWidth::Short) => "s",
        (true, IntegerWidth::Int) => "i",
        (true, IntegerWidth::Long | IntegerWidth::LongLong) => "q",
        (false, IntegerWidth::Char) => "C",
        (false, IntegerWidth::Short) => "S",
        (false, IntegerWidth::Int) => "I",
        (false, IntegerWidth::Long | IntegerWidth::LongLong) => "Q",
    }
}
