//! Free-text query understanding.

pub mod parser;

pub use parser::{parse_query, Intent, ParsedQuery};
