//! Label-anchored field extraction for CRLV vehicle-registration documents.
//!
//! A document is a flat sequence of text lines. Each field is found by
//! locating its printed label, then reading a bounded window of lines after
//! it, skipping blank and placeholder lines and checking the candidate
//! against the field's shape pattern where one exists.

mod document;
mod labels;
mod layout;
mod lines;
mod lookahead;
mod normalize;
mod patterns;
mod resolvers;
#[cfg(test)]
mod tests;

pub use document::{CrlvExtractor, FieldResolution};
pub use labels::LabelIndex;
pub use layout::LayoutProfile;
pub use lines::LineSequence;
pub use resolvers::Miss;
