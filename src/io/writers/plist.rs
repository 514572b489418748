//! Property-list writer for `.extracted` documents.
//!
//! The layout is fixed: tab indentation, one element per line, empty arrays
//! as `<array/>` and empty strings as `<string/>`. Consumers compare these
//! files textually, so the writer emits text directly instead of going
//! through a generic XML serializer.

use crate::core::{MethodDescriptor, TypeRecord};
use crate::io::output::{MetadataDocument, OutputWriter};
use html_escape::encode_double_quoted_attribute;
use std::io::Write;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const DOCTYPE: &str = r#"<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">"#;

pub struct PlistWriter<W: Write> {
    writer: W,
}

impl<W: Write> PlistWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn indent(&mut self, depth: usize) -> anyhow::Result<()> {
        for _ in 0..depth {
            self.writer.write_all(b"\t")?;
        }
        Ok(())
    }

    fn write_key(&mut self, depth: usize, key: &str) -> anyhow::Result<()> {
        self.write_text_element(depth, "key", key)
    }

    fn write_text_element(&mut self, depth: usize, tag: &str, text: &str) -> anyhow::Result<()> {
        self.indent(depth)?;
        if text.is_empty() {
            writeln!(self.writer, "<{tag}/>")?;
        } else {
            writeln!(
                self.writer,
                "<{tag}>{}</{tag}>",
                encode_double_quoted_attribute(text)
            )?;
        }
        Ok(())
    }

    fn write_record(&mut self, depth: usize, record: &TypeRecord) -> anyhow::Result<()> {
        self.indent(depth)?;
        writeln!(self.writer, "<dict>")?;

        self.write_key(depth + 1, "methods")?;
        if record.methods.is_empty() {
            self.indent(depth + 1)?;
            writeln!(self.writer, "<array/>")?;
        } else {
            self.indent(depth + 1)?;
            writeln!(self.writer, "<array>")?;
            for method in &record.methods {
                self.write_method(depth + 2, method)?;
            }
            self.indent(depth + 1)?;
            writeln!(self.writer, "</array>")?;
        }

        self.write_key(depth + 1, "name")?;
        self.write_text_element(depth + 1, "string", &record.name)?;

        // Categories carry no superclass entry at all
        if let Some(superclass) = record.superclass_name.as_deref().filter(|s| !s.is_empty()) {
            self.write_key(depth + 1, "superClassName")?;
            self.write_text_element(depth + 1, "string", superclass)?;
        }

        self.indent(depth)?;
        writeln!(self.writer, "</dict>")?;
        Ok(())
    }

    fn write_method(&mut self, depth: usize, method: &MethodDescriptor) -> anyhow::Result<()> {
        self.indent(depth)?;
        writeln!(self.writer, "<dict>")?;
        for (key, value) in [
            ("className", method.class_name.as_str()),
            ("displayName", method.display_name.as_str()),
            ("prefix", method.kind.marker()),
            ("selector", method.selector.as_str()),
            ("typeEncoding", method.encoding.as_str()),
        ] {
            self.write_key(depth + 1, key)?;
            self.write_text_element(depth + 1, "string", value)?;
        }
        self.indent(depth)?;
        writeln!(self.writer, "</dict>")?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for PlistWriter<W> {
    fn write_document(&mut self, document: &MetadataDocument) -> anyhow::Result<()> {
        writeln!(self.writer, "{XML_HEADER}")?;
        writeln!(self.writer, "{DOCTYPE}")?;
        writeln!(self.writer, r#"<plist version="1.0">"#)?;
        self.indent(1)?;
        writeln!(self.writer, "<dict>")?;

        self.write_key(2, "objcClasses")?;
        if document.records.is_empty() {
            self.indent(2)?;
            writeln!(self.writer, "<array/>")?;
        } else {
            self.indent(2)?;
            writeln!(self.writer, "<array>")?;
            for record in &document.records {
                self.write_record(3, record)?;
            }
            self.indent(2)?;
            writeln!(self.writer, "</array>")?;
        }

        self.write_key(2, "version")?;
        self.write_text_element(2, "real", &document.version)?;

        self.indent(1)?;
        writeln!(self.writer, "</dict>")?;
        writeln!(self.writer, "</plist>")?;
        self.writer.flush()?;
        Ok(())
    }
}
