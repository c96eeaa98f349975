//! Word search over the OCR corpus
//!
//! Splits a raw query into AND/OR terms, matches each term against every
//! recognized word with substring-or-edit-distance matching, and returns
//! the matched bounding boxes per image for highlighting.

mod engine;
mod fuzzy;
mod query;

pub use engine::{search, SearchMatch};
pub use fuzzy::{levenshtein, matches};
pub use query::{QueryMode, SearchQuery};
