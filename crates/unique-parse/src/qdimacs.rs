//! QDIMACS reader.
//!
//! ```text
//! c a comment
//! p cnf <vars> <clauses>
//! e 1 2 3 0
//! a 4 5 0
//! 1 -2 0
//! ...
//! ```
//!
//! Unlike QCIR, whitespace is preserved and lines are split on blank
//! runs; there is no `output(...)` line, so a synthetic AND gate over
//! every clause is appended once parsing finishes.

use std::io::BufRead;

use unique_ir::{DependencyMap, GateGraph, VariableType};

use crate::builder::GateGraphBuilder;
use crate::error::{ParseError, ParseResult};

pub const EXISTS_STRING: &str = "e";
pub const FORALL_STRING: &str = "a";

fn split_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Parse a QDIMACS file. Returns an empty dependency map (QDIMACS has
/// no `d` lines; see [`crate::dqdimacs`] for those).
pub fn parse<R: BufRead>(reader: R) -> ParseResult<(GateGraph, DependencyMap)> {
    let mut builder = GateGraphBuilder::new();
    for (idx, raw) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let raw = raw?;
        if raw.is_empty() || raw.starts_with('c') || raw.starts_with('p') {
            continue;
        }
        let tokens = split_tokens(&raw);
        if tokens.is_empty() {
            continue;
        }
        if tokens[0] == EXISTS_STRING || tokens[0] == FORALL_STRING {
            read_quantifier_block(&mut builder, &tokens, line_no)?;
        } else {
            read_clause(&mut builder, &tokens, line_no)?;
        }
    }
    builder.finish_clauses();
    builder.finish()
}

pub(crate) fn read_quantifier_block(builder: &mut GateGraphBuilder, tokens: &[String], line_no: usize) -> ParseResult<()> {
    let kind = if tokens[0] == EXISTS_STRING {
        VariableType::Existential
    } else if tokens[0] == FORALL_STRING {
        VariableType::Universal
    } else {
        return Err(malformed(line_no, "quantifier block must start with 'e' or 'a'"));
    };
    if tokens.last().map(String::as_str) != Some("0") {
        return Err(malformed(line_no, "quantifier block must end with '0'"));
    }
    let ids = tokens[1..tokens.len() - 1].to_vec();
    builder.quantifier_block(kind, &ids, line_no)
}

pub(crate) fn read_clause(builder: &mut GateGraphBuilder, tokens: &[String], line_no: usize) -> ParseResult<()> {
    if tokens.last().map(String::as_str) != Some("0") {
        return Err(malformed(line_no, "clause must end with '0'"));
    }
    let literals = &tokens[..tokens.len() - 1];
    builder.clause(literals, line_no)?;
    Ok(())
}

fn malformed(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::MalformedLine { line, message: message.into() }
}
