//! Input handling: format dispatch and content loading

pub mod format;
pub mod parser;

pub use format::DocumentFormat;
pub use parser::{DocumentContent, DocumentParser, LoadedDocument, SourceInfo};
