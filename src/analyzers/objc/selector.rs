//! Method prototype parsing.
//!
//! Accepts `<dir> ( <return type> ) <selector body>` where the body is either
//! a bare identifier or a sequence of `label:(type)name` groups. Every
//! parenthesized type is read with depth tracking, so block and function
//! pointer spellings that contain their own parentheses stay whole.

use super::encoder::{encode, CXX_DESTRUCT_ENCODING};
use super::normalizer::{display_spelling, normalize};
use super::tables::EncodingTables;
use crate::core::{MethodDescriptor, MethodKind, ParameterDescriptor, SemanticType};
use crate::errors::ParseError;

const CXX_DESTRUCT: &str = ".cxx_destruct";

/// Type assumed for a parameter declared without one.
const DEFAULT_PARAMETER_TYPE: &str = "id";

/// One `label:(type)` group as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter<'a> {
    pub label: &'a str,
    pub type_spelling: &'a str,
}

/// Structural split of a prototype before any type interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPrototype<'a> {
    pub kind: MethodKind,
    pub return_spelling: &'a str,
    /// Bare selector for argument-less methods
    pub name: Option<&'a str>,
    pub parameters: Vec<RawParameter<'a>>,
}

/// Parse a prototype into a fully encoded method descriptor.
pub fn parse(
    raw: &str,
    owner: &str,
    tables: &EncodingTables,
) -> Result<MethodDescriptor, ParseError> {
    let prototype = split(raw)?;

    if prototype.name == Some(CXX_DESTRUCT) {
        return Ok(MethodDescriptor {
            kind: prototype.kind,
            selector: CXX_DESTRUCT.to_string(),
            display_name: format!("{}(void) {}", prototype.kind, CXX_DESTRUCT),
            parameters: Vec::new(),
            return_type: SemanticType::Void,
            return_spelling: "void".to_string(),
            encoding: CXX_DESTRUCT_ENCODING.to_string(),
            class_name: owner.to_string(),
        });
    }

    let return_type = normalize(prototype.return_spelling, tables);
    let return_display = display_spelling(prototype.return_spelling);

    let parameters: Vec<ParameterDescriptor> = prototype
        .parameters
        .iter()
        .enumerate()
        .map(|(index, param)| {
            ParameterDescriptor::new(
                Some(param.label.to_string()).filter(|l| !l.is_empty()),
                normalize(param.type_spelling, tables),
                display_spelling(param.type_spelling),
                index,
            )
        })
        .collect();

    let (selector, display_name) = match prototype.name {
        Some(name) => (
            name.to_string(),
            format!("{}({}) {}", prototype.kind, return_display, name),
        ),
        None => {
            let selector: String = prototype
                .parameters
                .iter()
                .map(|p| format!("{}:", p.label))
                .collect();
            let segments: Vec<String> = prototype
                .parameters
                .iter()
                .zip(&parameters)
                .map(|(raw, param)| format!("{}:({})", raw.label, param.spelling))
                .collect();
            (
                selector,
                format!(
                    "{}({}) {}",
                    prototype.kind,
                    return_display,
                    segments.join(" ")
                ),
            )
        }
    };

    let parameter_types: Vec<SemanticType> = parameters.iter().map(|p| p.ty.clone()).collect();
    let encoding = encode(
        prototype.kind,
        &selector,
        &return_type,
        &parameter_types,
        tables,
    );

    Ok(MethodDescriptor {
        kind: prototype.kind,
        selector,
        display_name,
        parameters,
        return_type,
        return_spelling: return_display,
        encoding,
        class_name: owner.to_string(),
    })
}

/// Split a prototype into direction, return spelling and selector groups.
pub fn split(raw: &str) -> Result<RawPrototype<'_>, ParseError> {
    let text = raw.trim().trim_end_matches(';').trim_end();
    let mut cursor = Cursor::new(text);

    let kind = cursor
        .bump()
        .and_then(MethodKind::from_marker)
        .ok_or_else(|| ParseError::MissingDirection(text.to_string()))?;

    cursor.skip_whitespace();
    if cursor.peek() != Some('(') {
        return Err(ParseError::MissingReturnType(text.to_string()));
    }
    let return_spelling = cursor
        .parenthesized()
        .ok_or_else(|| ParseError::UnbalancedParens(text.to_string()))?
        .trim();
    if return_spelling.is_empty() {
        return Err(ParseError::MissingReturnType(text.to_string()));
    }

    cursor.skip_whitespace();
    if cursor.rest().starts_with(CXX_DESTRUCT) {
        return Ok(RawPrototype {
            kind,
            return_spelling,
            name: Some(CXX_DESTRUCT),
            parameters: Vec::new(),
        });
    }

    let first_label = cursor.identifier();
    let after_label = cursor.position();
    cursor.skip_whitespace();

    if cursor.peek() != Some(':') {
        if first_label.is_empty() {
            return Err(ParseError::EmptySelector(text.to_string()));
        }
        // Trailing availability macros and attributes are not part of the selector
        return Ok(RawPrototype {
            kind,
            return_spelling,
            name: Some(first_label),
            parameters: Vec::new(),
        });
    }

    cursor.rewind(after_label - first_label.len());
    let parameters = parse_parameters(&mut cursor, text)?;

    Ok(RawPrototype {
        kind,
        return_spelling,
        name: None,
        parameters,
    })
}

fn parse_parameters<'a>(
    cursor: &mut Cursor<'a>,
    text: &str,
) -> Result<Vec<RawParameter<'a>>, ParseError> {
    let mut parameters = Vec::new();

    loop {
        cursor.skip_whitespace();
        let group_start = cursor.position();
        let label = cursor.identifier();
        cursor.skip_whitespace();
        if !cursor.eat(':') {
            cursor.rewind(group_start);
            break;
        }

        cursor.skip_whitespace();
        let type_spelling = if cursor.peek() == Some('(') {
            cursor
                .parenthesized()
                .ok_or_else(|| ParseError::MalformedParameter {
                    prototype: text.to_string(),
                    index: parameters.len(),
                })?
                .trim()
        } else if label.is_empty() {
            return Err(ParseError::MalformedParameter {
                prototype: text.to_string(),
                index: parameters.len(),
            });
        } else {
            DEFAULT_PARAMETER_TYPE
        };

        parameters.push(RawParameter {
            label,
            type_spelling: if type_spelling.is_empty() {
                DEFAULT_PARAMETER_TYPE
            } else {
                type_spelling
            },
        });

        // Parameter name; when it is glued to a colon it was really the next label
        cursor.skip_whitespace();
        let name_start = cursor.position();
        cursor.identifier();
        if cursor.peek() == Some(':') {
            cursor.rewind(name_start);
        }

        cursor.skip_whitespace();
        if cursor.peek() == Some(',') {
            break;
        }
    }

    Ok(parameters)
}

/// Byte cursor over a prototype.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// Consume a balanced `( ... )` group and return its inner text.
    /// Leaves the cursor untouched when the group never closes.
    fn parenthesized(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.eat('(') {
            return None;
        }
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&self.text[start + 1..self.pos - 1]);
                    }
                }
                _ => {}
            }
        }
        self.pos = start;
        None
    }
}
