//! Toolkit Module - inspecting a language implementation
//!
//! - `ConfigurationModel`: the language, its properties and its parser
//! - `SourceCodeModel`: a parsed source with its XML rendering
//! - `LineOffsets`: token positions to text offsets, for highlighting
//! - `batch`: parallel parsing and querying of many files

pub mod batch;
pub mod line_offsets;
pub mod model;
pub mod property;
pub mod source_code;
pub mod validators;

pub use line_offsets::LineOffsets;
pub use model::{
    charset_of, charset_property, CachedConfigurationModel, ConfigurationModel, LexerlessConfiguration,
    ParserFactory, CHARSET_PROPERTY,
};
pub use property::{ConfigurationProperty, ValidationCallback};
pub use source_code::SourceCodeModel;
