//! DQDIMACS reader: QDIMACS plus `d <var> <dep1> ... <depk> 0` lines
//! that declare explicit dependency sets for DQBF existentials.

use std::io::BufRead;

use unique_ir::{DependencyMap, GateGraph};

use crate::builder::GateGraphBuilder;
use crate::error::{ParseError, ParseResult};
use crate::qdimacs::{self, EXISTS_STRING, FORALL_STRING};

pub const DEPENDENCY_STRING: &str = "d";

fn split_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

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
            qdimacs::read_quantifier_block(&mut builder, &tokens, line_no)?;
        } else if tokens[0] == DEPENDENCY_STRING {
            read_dependency_block(&mut builder, &tokens, line_no)?;
        } else {
            qdimacs::read_clause(&mut builder, &tokens, line_no)?;
        }
    }
    builder.finish_clauses();
    builder.finish()
}

fn read_dependency_block(builder: &mut GateGraphBuilder, tokens: &[String], line_no: usize) -> ParseResult<()> {
    if tokens.last().map(String::as_str) != Some("0") {
        return Err(ParseError::MalformedLine {
            line: line_no,
            message: "dependency block must end with '0'".to_string(),
        });
    }
    if tokens.len() < 3 {
        return Err(ParseError::MalformedLine {
            line: line_no,
            message: "dependency block needs a variable and a terminator".to_string(),
        });
    }
    let variable_id = &tokens[1];
    let dependency_ids = &tokens[2..tokens.len() - 1];
    builder.dependency(variable_id, dependency_ids, line_no)
}
