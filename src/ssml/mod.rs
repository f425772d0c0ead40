//! SSML reading: a strict subset of the markup, flattened into words.
//!
//! Supported tags are `speak` (root), `prosody`, `phoneme`, `sub` and
//! `say-as`. The last three annotate their whole content and may not contain
//! other tags.

mod parser;

pub use parser::{SsmlParser, SsmlWord, TagName};
