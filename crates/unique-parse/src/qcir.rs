//! QCIR reader/writer.
//!
//! Grammar (whitespace already stripped from every line before
//! dispatch, matching the original's `erase(remove_if(isspace))` pass):
//!
//! ```text
//! #QCIR-G14                 (comment, ignored)
//! exists(x1,x2,...)
//! forall(x1,x2,...)
//! g = and(lit,lit,...)
//! g = or(lit,lit,...)
//! output(g)
//! ```

use std::io::BufRead;

use unique_ir::{DependencyMap, GateGraph, GateKind, VariableType};

use crate::builder::GateGraphBuilder;
use crate::error::{ParseError, ParseResult};

pub const EXISTS_STRING: &str = "exists";
pub const FORALL_STRING: &str = "forall";
pub const OUTPUT_STRING: &str = "output";
pub const AND_STRING: &str = "and";
pub const OR_STRING: &str = "or";

fn strip_whitespace(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a QCIR file, returning the gate graph (with an empty, unused
/// dependency map — QCIR has no dependency lines).
pub fn parse<R: BufRead>(reader: R) -> ParseResult<(GateGraph, DependencyMap)> {
    let mut builder = GateGraphBuilder::new();
    for (idx, raw) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let raw = raw?;
        let line = strip_whitespace(&raw);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with(FORALL_STRING) || line.starts_with(EXISTS_STRING) {
            read_quantifier_block(&mut builder, &line, line_no)?;
        } else if line.starts_with(OUTPUT_STRING) {
            read_output(&mut builder, &line, line_no)?;
        } else {
            read_gate(&mut builder, &line, line_no)?;
        }
    }
    builder.finish()
}

fn read_quantifier_block(builder: &mut GateGraphBuilder, line: &str, line_no: usize) -> ParseResult<()> {
    let opening = line.find('(').ok_or_else(|| malformed(line_no, "missing '(' in quantifier block"))?;
    if !line.ends_with(')') {
        return Err(malformed(line_no, "quantifier block must end with ')'"));
    }
    let kind = if &line[..opening] == EXISTS_STRING {
        VariableType::Existential
    } else {
        VariableType::Universal
    };
    let ids: Vec<String> = line[opening + 1..line.len() - 1].split(',').map(str::to_string).collect();
    builder.quantifier_block(kind, &ids, line_no)
}

fn read_gate(builder: &mut GateGraphBuilder, line: &str, line_no: usize) -> ParseResult<()> {
    if !line.ends_with(')') {
        return Err(malformed(line_no, "gate definition must end with ')'"));
    }
    let equals = line.find('=').ok_or_else(|| malformed(line_no, "gate definition missing '='"))?;
    let opening = line.find('(').ok_or_else(|| malformed(line_no, "gate definition missing '('"))?;
    let gate_id = &line[..equals];
    let gate_type = &line[equals + 1..opening];
    let kind = if gate_type == AND_STRING {
        GateKind::And
    } else if gate_type == OR_STRING {
        GateKind::Or
    } else {
        return Err(malformed(line_no, format!("unknown gate type '{gate_type}'")));
    };
    let inputs: Vec<String> = line[opening + 1..line.len() - 1].split(',').map(str::to_string).collect();
    builder.gate(gate_id, kind, &inputs, line_no)?;
    Ok(())
}

fn read_output(builder: &mut GateGraphBuilder, line: &str, line_no: usize) -> ParseResult<()> {
    if !line.ends_with(')') {
        return Err(malformed(line_no, "output() must end with ')'"));
    }
    let opening = line.find('(').ok_or_else(|| malformed(line_no, "output() missing '('"))?;
    if opening != OUTPUT_STRING.len() {
        return Err(malformed(line_no, "malformed output() statement"));
    }
    let id = &line[opening + 1..line.len() - 1];
    builder.output(id);
    Ok(())
}

fn malformed(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::MalformedLine { line, message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_simple_existential_and() {
        let text = "#QCIR-G14\nexists(x,y)\ng = and(x,y)\noutput(g)\n";
        let (graph, deps) = parse(Cursor::new(text)).unwrap();
        assert!(deps.is_empty());
        assert_eq!(graph.number_variables(VariableType::Existential), 2);
        let g = graph.alias_of("g").unwrap();
        assert_eq!(graph.output_alias(), Some(g));
    }

    #[test]
    fn rejects_missing_output() {
        let text = "exists(x)\ng = and(x)\n";
        assert!(parse(Cursor::new(text)).is_err());
    }

    #[test]
    fn negated_literal_in_gate_input() {
        let text = "exists(x)\ng = and(-x)\noutput(g)\n";
        let (graph, _) = parse(Cursor::new(text)).unwrap();
        let g = graph.alias_of("g").unwrap();
        let x = graph.alias_of("x").unwrap();
        assert_eq!(graph.gate(g).inputs[0].alias(), x);
        assert!(graph.gate(g).inputs[0].is_negated());
    }
}
