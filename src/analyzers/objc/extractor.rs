//! Declaration extraction from one header's text.
//!
//! Comments and preprocessor lines are removed, the governing declaration is
//! located, and every `+`/`-` statement starting at a statement boundary is
//! returned as one logical line in declaration order. This is line/block extraction, not a grammar: anything
//! that does not look like a method declaration is skipped.

use super::normalizer::collapse_whitespace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Owner assumed when a unit declares no class, protocol or category.
pub const ROOT_CLASS: &str = "NSObject";

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*#[^\n]*$").unwrap());

static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@interface\s+(\w+)\s*(?:<[^>]*>)?\s*:\s*(\w+)").unwrap()
});
static PROTOCOL_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"@protocol\s+(\w+)\s*([;,]?)").unwrap());
static CATEGORY_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@interface\s+(\w+)\s*(?:<[^>]*>)?\s*\(\s*(\w*)\s*\)").unwrap()
});

/// Section markers inside a protocol that may directly precede a method.
const SECTION_MARKERS: [&str; 2] = ["@optional", "@required"];

/// Which construct owns the extracted methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Class,
    Protocol,
    Category,
    /// No declaration found; methods fall back to the root class
    Implicit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerDeclaration {
    pub name: String,
    pub superclass: Option<String>,
    pub kind: OwnerKind,
}

impl OwnerDeclaration {
    fn implicit() -> Self {
        Self {
            name: ROOT_CLASS.to_string(),
            superclass: None,
            kind: OwnerKind::Implicit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUnit {
    pub owner: OwnerDeclaration,
    /// Raw prototypes, whitespace-collapsed, in declaration order
    pub prototypes: Vec<String>,
}

impl ExtractedUnit {
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

/// Extract the owner and raw method prototypes from a unit.
pub fn extract(unit_text: &str) -> ExtractedUnit {
    let cleaned = strip_comments_and_directives(unit_text);
    let owner = find_owner(&cleaned);

    let mut seen = HashSet::new();
    let prototypes = method_statements(&cleaned)
        .into_iter()
        .filter(|statement| seen.insert(dedup_key(statement)))
        .collect();

    ExtractedUnit { owner, prototypes }
}

/// Remove block comments, line comments and preprocessor lines.
pub fn strip_comments_and_directives(text: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(text, " ");
    let without_lines = LINE_COMMENT.replace_all(&without_blocks, "");
    DIRECTIVE.replace_all(&without_lines, "").into_owned()
}

/// Governing declaration in precedence order: class, protocol, category.
pub fn find_owner(text: &str) -> OwnerDeclaration {
    if let Some(caps) = CLASS_DECL.captures(text) {
        return OwnerDeclaration {
            name: caps[1].to_string(),
            superclass: Some(caps[2].to_string()),
            kind: OwnerKind::Class,
        };
    }

    // `@protocol Foo;` and `@protocol Foo, Bar;` are forward declarations
    if let Some(caps) = PROTOCOL_DECL
        .captures_iter(text)
        .find(|caps| caps[2].is_empty())
    {
        return OwnerDeclaration {
            name: caps[1].to_string(),
            superclass: Some(ROOT_CLASS.to_string()),
            kind: OwnerKind::Protocol,
        };
    }

    if let Some(caps) = CATEGORY_DECL.captures(text) {
        return OwnerDeclaration {
            name: caps[1].to_string(),
            superclass: None,
            kind: OwnerKind::Category,
        };
    }

    OwnerDeclaration::implicit()
}

/// Every `;`-terminated method statement, collapsed onto one line.
///
/// A statement starts with `+`/`-` and `(` at a statement boundary and ends
/// at the first `;` outside parentheses and string literals. Reaching a brace
/// or an `@` keyword first means it was not a declaration.
fn method_statements(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut statements = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => pos = skip_literal(bytes, pos),
            b'+' | b'-' if opens_return_type(bytes, pos) && at_statement_boundary(text, pos) => {
                match statement_end(bytes, pos) {
                    Some(end) => {
                        statements.push(collapse_whitespace(&text[pos..=end]));
                        pos = end + 1;
                    }
                    None => pos += 1,
                }
            }
            _ => pos += 1,
        }
    }
    statements
}

/// Whether only blanks separate `pos` from a line start, a statement
/// terminator, a brace or a protocol section marker.
fn at_statement_boundary(text: &str, pos: usize) -> bool {
    let before = text[..pos].trim_end_matches([' ', '\t', '\r']);
    before.is_empty()
        || before.ends_with(['\n', ';', '{', '}'])
        || SECTION_MARKERS.iter().any(|marker| before.ends_with(marker))
}

fn opens_return_type(bytes: &[u8], marker: usize) -> bool {
    bytes[marker + 1..]
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'(')
}

/// Index of the terminating `;`, or `None` when the candidate is abandoned.
fn statement_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = start + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => {
                pos = skip_literal(bytes, pos);
                continue;
            }
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => return Some(pos),
            b'{' | b'}' if depth == 0 => return None,
            b'@' if depth == 0 && bytes.get(pos + 1).is_some_and(u8::is_ascii_alphabetic) => {
                return None
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

/// Position just past the string or character literal opening at `start`.
fn skip_literal(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b if b == quote => return pos + 1,
            b'\n' => return pos,
            _ => pos += 1,
        }
    }
    bytes.len()
}

/// Direction plus the selector text after the return type.
fn dedup_key(statement: &str) -> String {
    let direction = &statement[..1];
    let after_return = statement
        .find(')')
        .map(|close| &statement[close + 1..])
        .unwrap_or(statement);
    let selector = after_return.trim().trim_end_matches(';').trim_end();
    format!("{direction}{selector}")
}
