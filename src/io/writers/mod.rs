pub mod json;
pub mod plist;

pub use crate::io::output::OutputFormat;
pub use json::JsonWriter;
pub use plist::PlistWriter;
