//! Type spelling normalization.
//!
//! Maps a raw type spelling from a declaration onto a [`SemanticType`]. The
//! function is total: spellings that match no rule become
//! [`SemanticType::UnknownObject`], which encodes like an object.
//!
//! Object pointers are recognized by naming convention (`NS*`, `UI*` and any
//! configured prefixes), not by symbol resolution. A class that does not
//! follow the convention is classified as a generic pointer.

use super::tables::{primitive, EncodingTables};
use crate::core::{BlockShape, Pointee, SemanticType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Ownership and nullability annotations that never affect the encoding.
static ANNOTATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:_Nullable|_Nonnull|_Null_unspecified|__nullable|__nonnull|nullable|nonnull|null_unspecified|__kindof|__strong|__weak|__unsafe_unretained|__autoreleasing|__block|NS_NOESCAPE)\b",
    )
    .unwrap()
});

/// Distributed-object qualifiers; only meaningful as leading keywords.
static DO_QUALIFIERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:oneway|inout|in|out|bycopy|byref)\s+)+").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static CONST_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bconst\b").unwrap());

const BLOCK_ALIAS_NO_ARGUMENT: &str = "dispatch_block_t";
const BLOCK_ALIAS_OPAQUE: &str = "CDUnknownBlockType";

/// Collapse runs of whitespace to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Canonical form used for matching: annotations removed, whitespace
/// collapsed, trailing pointer markers written as ` **`.
pub fn canonical_spelling(spelling: &str) -> String {
    let stripped = ANNOTATIONS.replace_all(spelling, " ");
    let collapsed = collapse_whitespace(&stripped);
    let mut text = DO_QUALIFIERS.replace(&collapsed, "").into_owned();

    // `NSString * const` qualifies the pointer itself, which the encoding ignores
    if let Some(rest) = text.strip_suffix("const") {
        if rest.trim_end().ends_with('*') {
            text = rest.trim_end().to_string();
        }
    }

    if is_block_spelling(&text) {
        return text;
    }

    let (base, stars) = split_pointer_markers(&text);
    if stars == 0 {
        base.to_string()
    } else {
        format!("{} {}", base, "*".repeat(stars))
    }
}

/// Spelling shown in display names: whitespace collapsed, boolean spellings
/// unified as `bool`, anything naming `Protocol` shown as `Protocol *`.
pub fn display_spelling(spelling: &str) -> String {
    let collapsed = collapse_whitespace(spelling);
    if is_boolean(&collapsed) {
        "bool".to_string()
    } else if collapsed.contains("Protocol") {
        "Protocol *".to_string()
    } else {
        collapsed
    }
}

/// Normalize a raw spelling into its semantic tag.
pub fn normalize(spelling: &str, tables: &EncodingTables) -> SemanticType {
    let canonical = canonical_spelling(spelling);
    let text = canonical.as_str();

    if is_boolean(text) {
        return SemanticType::Boolean;
    }

    if text == "instancetype" {
        return SemanticType::object();
    }

    if let Some(ty) = registered_struct(text, tables) {
        return ty;
    }

    let (inner, stars) = split_pointer_markers(text);
    let is_const = CONST_WORD.is_match(inner);
    let base = collapse_whitespace(&CONST_WORD.replace_all(inner, " "));

    if base == "Protocol" || base.starts_with("Protocol<") || base.starts_with("Protocol <") {
        return SemanticType::ProtocolMeta;
    }

    if stars >= 2 {
        let pointee = if is_object_base(&base, tables) {
            Pointee::Object
        } else {
            Pointee::Pointer
        };
        return SemanticType::PointerToPointer { is_const, pointee };
    }

    if stars == 1 {
        return single_pointer(&base, is_const, tables);
    }

    if is_block_spelling(text) {
        return SemanticType::Block(classify_block(text, tables));
    }

    if is_id_with_protocols(&base) {
        return SemanticType::object();
    }
    if has_protocol_list(&base, "Class") {
        return SemanticType::ClassMeta;
    }

    primitive(&base).unwrap_or(SemanticType::UnknownObject)
}

fn single_pointer(base: &str, is_const: bool, tables: &EncodingTables) -> SemanticType {
    if tables.has_object_prefix(base) {
        SemanticType::ObjectPointer { is_const }
    } else if base == "char" {
        SemanticType::CString { is_const }
    } else if base == "id" || is_id_with_protocols(base) {
        SemanticType::PointerToPointer {
            is_const,
            pointee: Pointee::Object,
        }
    } else {
        SemanticType::GenericPointer { is_const }
    }
}

fn is_object_base(base: &str, tables: &EncodingTables) -> bool {
    tables.has_object_prefix(base) || base == "id" || is_id_with_protocols(base)
}

fn is_id_with_protocols(base: &str) -> bool {
    has_protocol_list(base, "id")
}

/// `keyword<...>` or `keyword <...>`.
fn has_protocol_list(base: &str, keyword: &str) -> bool {
    base.strip_prefix(keyword)
        .is_some_and(|rest| rest.trim_start().starts_with('<'))
}

fn is_boolean(text: &str) -> bool {
    matches!(text.to_ascii_lowercase().as_str(), "_bool" | "bool" | "bool_")
}

fn registered_struct(text: &str, tables: &EncodingTables) -> Option<SemanticType> {
    let lookup = |name: &str| {
        tables.struct_layout(name).map(|layout| SemanticType::Struct {
            name: name.to_string(),
            layout: layout.to_string(),
        })
    };

    lookup(text).or_else(|| {
        text.strip_prefix("struct ")
            .map(str::trim)
            .and_then(lookup)
    })
}

/// Split trailing `*` markers off a spelling, returning the base and the count.
fn split_pointer_markers(text: &str) -> (&str, usize) {
    let mut base = text.trim_end();
    let mut stars = 0;
    while let Some(rest) = base.strip_suffix('*') {
        stars += 1;
        base = rest.trim_end();
    }
    (base, stars)
}

fn is_block_spelling(text: &str) -> bool {
    text.contains('^') || text == BLOCK_ALIAS_OPAQUE || text == BLOCK_ALIAS_NO_ARGUMENT
}

/// Classify a block by its own argument list, when it can be read back from
/// the spelling `ret (^)(args)`.
fn classify_block(text: &str, tables: &EncodingTables) -> BlockShape {
    match text {
        BLOCK_ALIAS_NO_ARGUMENT => return BlockShape::NoArgument,
        BLOCK_ALIAS_OPAQUE => return BlockShape::Opaque,
        _ => {}
    }

    let Some(arguments) = block_arguments(text) else {
        return unclassified_block(text);
    };

    let arguments = arguments.trim();
    if arguments.is_empty() || arguments == "void" {
        return BlockShape::NoArgument;
    }
    if has_top_level_comma(arguments) {
        return unclassified_block(text);
    }

    match argument_type(arguments, tables) {
        SemanticType::Boolean => BlockShape::BoolArgument,
        SemanticType::ObjectPointer { .. } => BlockShape::ObjectArgument,
        _ => unclassified_block(text),
    }
}

/// Shape of a block whose arguments say nothing, decided by its result type.
fn unclassified_block(text: &str) -> BlockShape {
    let result = text.find("(^").map_or("", |caret| text[..caret].trim());
    if is_boolean(result) {
        BlockShape::BoolResult
    } else {
        BlockShape::Generic
    }
}

/// Text of the argument list following the `(^...)` group.
fn block_arguments(text: &str) -> Option<&str> {
    let caret_group = text.find("(^")?;
    let after_caret = caret_group + closing_paren(&text[caret_group..])? + 1;
    let rest = &text[after_caret..];
    let open = rest.find('(')?;
    if !rest[..open].trim().is_empty() {
        return None;
    }
    let close = closing_paren(&rest[open..])?;
    Some(&rest[open + 1..open + close])
}

/// Byte index of the paren closing the one at the start of `text`.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn has_top_level_comma(text: &str) -> bool {
    let mut depth = 0i32;
    text.chars().any(|c| {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => depth -= 1,
            _ => {}
        }
        c == ',' && depth == 0
    })
}

/// Type of a single block argument, which may carry a parameter name.
fn argument_type(argument: &str, tables: &EncodingTables) -> SemanticType {
    let ty = normalize(argument, tables);
    if ty != SemanticType::UnknownObject {
        return ty;
    }

    let trimmed = argument.trim_end();
    let name_start = trimmed
        .rfind(|c: char| !(c.is_alphanumeric() || c == '_'))
        .map(|i| i + 1)
        .unwrap_or(0);
    if name_start == 0 {
        return ty;
    }
    normalize(&trimmed[..name_start], tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IntegerWidth;

    fn norm(spelling: &str) -> SemanticType {
        normalize(spelling, &EncodingTables::default())
    }

    #[test]
    fn test_boolean_spellings() {
        for spelling in ["BOOL", "_Bool", "Bool", "bool", "bool_", "_BOOL"] {
            assert_eq!(norm(spelling), SemanticType::Boolean, "{spelling}");
        }
    }

    #[test]
    fn test_instancetype_is_object() {
        assert_eq!(norm("instancetype"), SemanticType::object());
        assert_eq!(norm("id"), SemanticType::object());
    }

    #[test]
    fn test_registered_structs() {
        match norm("CGRect") {
            SemanticType::Struct { name, layout } => {
                assert_eq!(name, "CGRect");
                assert_eq!(layout, "{CGRect={CGPoint=dd}{CGSize=dd}}");
            }
            other => panic!("expected struct, got {other:?}"),
        }
        assert!(matches!(norm("struct CGPoint"), SemanticType::Struct { .. }));
        assert!(matches!(norm("struct _NSZone *"), SemanticType::Struct { .. }));
        assert!(matches!(norm("NSZone*"), SemanticType::Struct { .. }));
    }

    #[test]
    fn test_unregistered_struct_is_unknown_object() {
        assert_eq!(norm("MKCoordinateRegion"), SemanticType::UnknownObject);
        assert_eq!(norm("struct Opaque"), SemanticType::UnknownObject);
    }

    #[test]
    fn test_double_pointers() {
        assert_eq!(
            norm("NSError **"),
            SemanticType::PointerToPointer {
                is_const: false,
                pointee: Pointee::Object
            }
        );
        assert_eq!(
            norm("const NSString **"),
            SemanticType::PointerToPointer {
                is_const: true,
                pointee: Pointee::Object
            }
        );
        assert_eq!(
            norm("char **"),
            SemanticType::PointerToPointer {
                is_const: false,
                pointee: Pointee::Pointer
            }
        );
        assert_eq!(
            norm("const char * *"),
            SemanticType::PointerToPointer {
                is_const: true,
                pointee: Pointee::Pointer
            }
        );
    }

    #[test]
    fn test_single_pointers() {
        assert_eq!(norm("NSString *"), SemanticType::object());
        assert_eq!(norm("UIView*"), SemanticType::object());
        assert_eq!(
            norm("const NSString *"),
            SemanticType::ObjectPointer { is_const: true }
        );
        assert_eq!(norm("char *"), SemanticType::CString { is_const: false });
        assert_eq!(norm("const char *"), SemanticType::CString { is_const: true });
        assert_eq!(
            norm("void *"),
            SemanticType::GenericPointer { is_const: false }
        );
        assert_eq!(
            norm("const void *"),
            SemanticType::GenericPointer { is_const: true }
        );
        assert_eq!(
            norm("id *"),
            SemanticType::PointerToPointer {
                is_const: false,
                pointee: Pointee::Object
            }
        );
    }

    #[test]
    fn test_prefix_heuristic_misclassifies_foreign_objects() {
        // Classes outside the naming convention are treated as plain pointers
        assert_eq!(
            norm("CKRecord *"),
            SemanticType::GenericPointer { is_const: false }
        );
        let tables = EncodingTables::default().with_object_prefix("CK");
        assert_eq!(normalize("CKRecord *", &tables), SemanticType::object());
    }

    #[test]
    fn test_annotations_are_ignored() {
        assert_eq!(norm("nullable NSString *"), SemanticType::object());
        assert_eq!(norm("NSString * _Nullable"), SemanticType::object());
        assert_eq!(norm("__kindof UIView *"), SemanticType::object());
        assert_eq!(norm("NSString * const"), SemanticType::object());
        assert_eq!(norm("oneway void"), SemanticType::Void);
        assert_eq!(
            norm("out NSError **"),
            SemanticType::PointerToPointer {
                is_const: false,
                pointee: Pointee::Object
            }
        );
    }

    #[test]
    fn test_generic_collections_are_objects() {
        assert_eq!(norm("NSArray<NSString *> *"), SemanticType::object());
        assert_eq!(norm("NSDictionary<NSString *, id> *"), SemanticType::object());
        assert_eq!(norm("id<NSCopying>"), SemanticType::object());
        assert_eq!(norm("id <UITableViewDelegate>"), SemanticType::object());
    }

    #[test]
    fn test_class_with_protocols_is_class_meta() {
        assert_eq!(norm("Class<NSCopying>"), SemanticType::ClassMeta);
        assert_eq!(norm("Class <NSCopying, NSCoding>"), SemanticType::ClassMeta);
        assert_eq!(norm("ClassRegistry"), SemanticType::UnknownObject);
    }

    #[test]
    fn test_protocol_meta() {
        assert_eq!(norm("Protocol *"), SemanticType::ProtocolMeta);
        assert_eq!(norm("Protocol*"), SemanticType::ProtocolMeta);
    }

    #[test]
    fn test_block_classification() {
        assert_eq!(
            norm("void (^)(void)"),
            SemanticType::Block(BlockShape::NoArgument)
        );
        assert_eq!(norm("void (^)()"), SemanticType::Block(BlockShape::NoArgument));
        assert_eq!(
            norm("dispatch_block_t"),
            SemanticType::Block(BlockShape::NoArgument)
        );
        assert_eq!(
            norm("void (^)(BOOL)"),
            SemanticType::Block(BlockShape::BoolArgument)
        );
        assert_eq!(
            norm("void (^)(BOOL finished)"),
            SemanticType::Block(BlockShape::BoolArgument)
        );
        assert_eq!(
            norm("void (^)(id)"),
            SemanticType::Block(BlockShape::ObjectArgument)
        );
        assert_eq!(
            norm("void (^)(NSError *error)"),
            SemanticType::Block(BlockShape::ObjectArgument)
        );
        assert_eq!(
            norm("void (^)(NSData *, NSError *)"),
            SemanticType::Block(BlockShape::Generic)
        );
        assert_eq!(
            norm("CDUnknownBlockType"),
            SemanticType::Block(BlockShape::Opaque)
        );
        assert_eq!(
            norm("BOOL (^)(id obj, NSUInteger idx)"),
            SemanticType::Block(BlockShape::BoolResult)
        );
        assert_eq!(
            norm("BOOL (^)(BOOL)"),
            SemanticType::Block(BlockShape::BoolArgument)
        );
        assert_eq!(
            norm("void (^ _Nullable)(int)"),
            SemanticType::Block(BlockShape::Generic)
        );
    }

    #[test]
    fn test_primitives() {
        assert_eq!(norm("void"), SemanticType::Void);
        assert_eq!(norm("int"), SemanticType::signed(IntegerWidth::Int));
        assert_eq!(
            norm("unsigned  long long"),
            SemanticType::unsigned(IntegerWidth::LongLong)
        );
        assert_eq!(norm("const int"), SemanticType::signed(IntegerWidth::Int));
        assert_eq!(norm("double"), SemanticType::Double);
        assert_eq!(norm("float"), SemanticType::Floating);
        assert_eq!(norm("SEL"), SemanticType::SelectorMeta);
        assert_eq!(norm("Class"), SemanticType::ClassMeta);
        assert_eq!(norm("IMP"), SemanticType::FunctionPointer);
    }

    #[test]
    fn test_unknown_defaults_to_object() {
        assert_eq!(norm("NSStringEncoding"), SemanticType::UnknownObject);
        assert_eq!(norm(""), SemanticType::UnknownObject);
        assert_eq!(norm("???"), SemanticType::UnknownObject);
    }

    #[test]
    fn test_canonical_spelling() {
        assert_eq!(canonical_spelling("NSError**"), "NSError **");
        assert_eq!(canonical_spelling("  NSString   * "), "NSString *");
        assert_eq!(canonical_spelling("NSError * * _Nullable"), "NSError **");
        assert_eq!(canonical_spelling("unsigned\n\tint"), "unsigned int");
    }

    #[test]
    fn test_display_spelling() {
        assert_eq!(display_spelling("BOOL"), "bool");
        assert_eq!(display_spelling("_Bool"), "bool");
        assert_eq!(display_spelling("Protocol*"), "Protocol *");
        assert_eq!(display_spelling("NSString  *"), "NSString *");
        assert_eq!(display_spelling("instancetype"), "instancetype");
    }
}
