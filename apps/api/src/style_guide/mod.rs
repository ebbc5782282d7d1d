// Style guide ingestion: PDF text extraction and header-based sectioning.
// Nothing here talks to the LLM; the content module consumes the resulting StyleGuide.

pub mod extract;
pub mod sectionizer;

#[cfg(test)]
pub mod fixtures;

pub use extract::{extract_text, ExtractionError};
pub use sectionizer::{sectionize, StyleGuide};
