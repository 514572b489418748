//! Lookup tables consulted by the normalizer and the encoder.
//!
//! Every entry is data: the override table maps well-known runtime selectors
//! to the literal encoding the runtime reports, the struct registry maps
//! struct spellings to their member layout, and the primitive table maps C
//! and Foundation scalar names to semantic tags. Configuration can extend the
//! first two and the object prefix set.

use crate::core::{IntegerWidth, MethodKind, SemanticType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Selectors whose encodings are fixed by the runtime. Keyed by selector only;
/// these apply to both instance and class methods.
const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    // Memory management
    ("dealloc", "v16@0:8"),
    ("release", "v16@0:8"),
    ("retain", "@16@0:8"),
    ("autorelease", "@16@0:8"),
    // Allocation and initialization
    ("alloc", "@16@0:8"),
    ("new", "@16@0:8"),
    ("init", "@16@0:8"),
    // Equality and hashing
    ("isEqual:", "B24@0:8@16"),
    ("hash", "Q16@0:8"),
    // Description
    ("description", "@16@0:8"),
    ("debugDescription", "@16@0:8"),
    // Introspection
    ("class", "#16@0:8"),
    ("superclass", "#16@0:8"),
    ("isKindOfClass:", "B24@0:8#16"),
    ("isMemberOfClass:", "B24@0:8#16"),
    ("respondsToSelector:", "B24@0:8:16"),
    ("conformsToProtocol:", "B24@0:8^#16"),
    // Copying
    ("copy", "@16@0:8"),
    ("mutableCopy", "@16@0:8"),
    ("copyWithZone:", "@24@0:8^{_NSZone=}16"),
    ("mutableCopyWithZone:", "@24@0:8^{_NSZone=}16"),
];

const DEFAULT_STRUCTS: &[(&str, &str)] = &[
    ("CGRect", "{CGRect={CGPoint=dd}{CGSize=dd}}"),
    ("CGPoint", "{CGPoint=dd}"),
    ("CGSize", "{CGSize=dd}"),
    ("NSRange", "{_NSRange=QQ}"),
    ("UIEdgeInsets", "{UIEdgeInsets=dddd}"),
    ("CGAffineTransform", "{CGAffineTransform=dddddd}"),
    (
        "IMAAdPlaybackInfo",
        "^{?=iiiiddddd{?=iiiiiiiiiiiiii}}",
    ),
    ("struct _NSZone *", "^{_NSZone=}"),
    ("_NSZone *", "^{_NSZone=}"),
    ("NSZone *", "^{_NSZone=}"),
];

const DEFAULT_OBJECT_PREFIXES: &[&str] = &["NS", "UI"];

static PRIMITIVES: Lazy<HashMap<&'static str, SemanticType>> = Lazy::new(|| {
    use IntegerWidth::*;

    let mut table = HashMap::new();
    table.insert("void", SemanticType::Void);
    table.insert("id", SemanticType::object());
    table.insert("Class", SemanticType::ClassMeta);
    table.insert("SEL", SemanticType::SelectorMeta);
    table.insert("IMP", SemanticType::FunctionPointer);

    table.insert("float", SemanticType::Floating);
    table.insert("CGFloat", SemanticType::Floating);
    table.insert("double", SemanticType::Double);
    table.insert("long double", SemanticType::Double);
    table.insert("NSTimeInterval", SemanticType::Double);

    table.insert("char", SemanticType::signed(Char));
    table.insert("signed char", SemanticType::signed(Char));
    table.insert("short", SemanticType::signed(Short));
    table.insert("int", SemanticType::signed(Int));
    table.insert("signed", SemanticType::signed(Int));
    table.insert("long", SemanticType::signed(Long));
    table.insert("long int", SemanticType::signed(Long));
    table.insert("long long", SemanticType::signed(LongLong));
    table.insert("NSInteger", SemanticType::signed(Int));
    table.insert("int8_t", SemanticType::signed(Char));
    table.insert("int16_t", SemanticType::signed(Short));
    table.insert("int32_t", SemanticType::signed(Int));
    table.insert("int64_t", SemanticType::signed(LongLong));

    table.insert("unsigned char", SemanticType::unsigned(Char));
    table.insert("unsigned short", SemanticType::unsigned(Short));
    table.insert("unsigned int", SemanticType::unsigned(Int));
    table.insert("unsigned", SemanticType::unsigned(Int));
    table.insert("unsigned long", SemanticType::unsigned(Long));
    table.insert("unsigned long long", SemanticType::unsigned(LongLong));
    table.insert("NSUInteger", SemanticType::unsigned(Long));
    table.insert("size_t", SemanticType::unsigned(Long));
    table.insert("uint8_t", SemanticType::unsigned(Char));
    table.insert("uint16_t", SemanticType::unsigned(Short));
    table.insert("uint32_t", SemanticType::unsigned(Int));
    table.insert("uint64_t", SemanticType::unsigned(LongLong));
    table
});

/// Look up a scalar or runtime primitive by its canonical spelling.
pub fn primitive(name: &str) -> Option<SemanticType> {
    PRIMITIVES.get(name).cloned()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OverrideKey {
    kind: Option<MethodKind>,
    selector: String,
}

/// Rule tables passed explicitly into normalization and encoding.
#[derive(Debug, Clone)]
pub struct EncodingTables {
    overrides: HashMap<OverrideKey, String>,
    structs: HashMap<String, String>,
    object_prefixes: Vec<String>,
}

impl Default for EncodingTables {
    fn default() -> Self {
        let overrides = DEFAULT_OVERRIDES
            .iter()
            .map(|(selector, encoding)| {
                (
                    OverrideKey {
                        kind: None,
                        selector: (*selector).to_string(),
                    },
                    (*encoding).to_string(),
                )
            })
            .collect();

        let structs = DEFAULT_STRUCTS
            .iter()
            .map(|(name, layout)| ((*name).to_string(), (*layout).to_string()))
            .collect();

        Self {
            overrides,
            structs,
            object_prefixes: DEFAULT_OBJECT_PREFIXES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

impl EncodingTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override; `kind == None` applies to both directions.
    pub fn with_override(
        mut self,
        kind: Option<MethodKind>,
        selector: impl Into<String>,
        encoding: impl Into<String>,
    ) -> Self {
        self.overrides.insert(
            OverrideKey {
                kind,
                selector: selector.into(),
            },
            encoding.into(),
        );
        self
    }

    pub fn with_struct(mut self, name: impl Into<String>, layout: impl Into<String>) -> Self {
        self.structs.insert(name.into(), layout.into());
        self
    }

    pub fn with_object_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !prefix.is_empty() && !self.object_prefixes.contains(&prefix) {
            self.object_prefixes.push(prefix);
        }
        self
    }

    /// Direction-specific entries win over direction-agnostic ones.
    pub fn override_for(&self, kind: MethodKind, selector: &str) -> Option<&str> {
        let specific = OverrideKey {
            kind: Some(kind),
            selector: selector.to_string(),
        };
        let any = OverrideKey {
            kind: None,
            selector: selector.to_string(),
        };
        self.overrides
            .get(&specific)
            .or_else(|| self.overrides.get(&any))
            .map(String::as_str)
    }

    pub fn struct_layout(&self, name: &str) -> Option<&str> {
        self.structs.get(name).map(String::as_str)
    }

    /// Naming-convention test for object types, e.g. `NSString`, `UIView`.
    pub fn has_object_prefix(&self, base: &str) -> bool {
        self.object_prefixes.iter().any(|p| base.starts_with(p.as_str()))
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}
