use crate::core::{MethodDescriptor, TypeRecord};
use crate::io::output::{MetadataDocument, OutputWriter};
use serde::Serialize;
use serde_json::{Number, Value};
use std::io::Write;

/// Same structure and key names as the property list.
#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(rename = "objcClasses")]
    objc_classes: Vec<JsonClass<'a>>,
    version: Value,
}

#[derive(Serialize)]
struct JsonClass<'a> {
    methods: Vec<JsonMethod<'a>>,
    name: &'a str,
    #[serde(rename = "superClassName", skip_serializing_if = "Option::is_none")]
    super_class_name: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMethod<'a> {
    class_name: &'a str,
    display_name: &'a str,
    prefix: &'static str,
    selector: &'a str,
    type_encoding: &'a str,
}

impl<'a> From<&'a TypeRecord> for JsonClass<'a> {
    fn from(record: &'a TypeRecord) -> Self {
        Self {
            methods: record.methods.iter().map(JsonMethod::from).collect(),
            name: &record.name,
            super_class_name: record.superclass_name.as_deref().filter(|s| !s.is_empty()),
        }
    }
}

impl<'a> From<&'a MethodDescriptor> for JsonMethod<'a> {
    fn from(method: &'a MethodDescriptor) -> Self {
        Self {
            class_name: &method.class_name,
            display_name: &method.display_name,
            prefix: method.kind.marker(),
            selector: &method.selector,
            type_encoding: &method.encoding,
        }
    }
}

/// Numeric versions are written as JSON numbers, anything else as a string.
fn version_value(version: &str) -> Value {
    version
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(version.to_string()))
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_document(&mut self, document: &MetadataDocument) -> anyhow::Result<()> {
        let json = JsonDocument {
            objc_classes: document.records.iter().map(JsonClass::from).collect(),
            version: version_value(&document.version),
        };
        serde_json::to_writer_pretty(&mut self.writer, &json)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
