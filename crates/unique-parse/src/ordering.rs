//! Parses an ordering file (a single line of whitespace-separated
//! variable ids, highest priority first) into the map
//! `selector::apply_ordering` consumes.

use std::io::BufRead;

use rustc_hash::FxHashMap;
use unique_ir::GateId;

use crate::error::ParseResult;

/// Read an ordering file: the first line, tokenized on whitespace.
/// Earlier tokens get lower (higher-priority) indices.
pub fn parse<R: BufRead>(mut reader: R) -> ParseResult<FxHashMap<GateId, usize>> {
    let mut ordering = FxHashMap::default();
    let mut line = String::new();
    reader.read_line(&mut line)?;
    for (priority, token) in line.split_whitespace().enumerate() {
        ordering.insert(token.to_string(), priority);
    }
    Ok(ordering)
}
