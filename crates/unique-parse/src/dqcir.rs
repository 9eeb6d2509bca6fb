//! DQCIR reader: QCIR plus `d <var> <dep1> ... <depk> 0` dependency
//! lines.
//!
//! Dependency lines are dispatched on the whitespace-*stripped* copy of
//! the line (to recognize the leading `d`) but tokenized from the
//! *original* line, because stripping whitespace would fuse adjacent
//! identifiers together — a quirk carried over unchanged from the
//! reference implementation.

use std::io::BufRead;

use unique_ir::{DependencyMap, GateGraph, GateKind, VariableType};

use crate::builder::GateGraphBuilder;
use crate::dqdimacs::DEPENDENCY_STRING;
use crate::error::{ParseError, ParseResult};
use crate::qcir::{AND_STRING, EXISTS_STRING, FORALL_STRING, OR_STRING, OUTPUT_STRING};

fn strip_whitespace(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn parse<R: BufRead>(reader: R) -> ParseResult<(GateGraph, DependencyMap)> {
    let mut builder = GateGraphBuilder::new();
    for (idx, raw) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let raw = raw?;
        let stripped = strip_whitespace(&raw);
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }
        if stripped.starts_with(FORALL_STRING) || stripped.starts_with(EXISTS_STRING) {
            read_quantifier_block(&mut builder, &stripped, line_no)?;
        } else if stripped.starts_with(OUTPUT_STRING) {
            read_output(&mut builder, &stripped, line_no)?;
        } else if stripped.starts_with(DEPENDENCY_STRING) {
            read_dependency_block(&mut builder, &raw, line_no)?;
        } else {
            read_gate(&mut builder, &stripped, line_no)?;
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

fn read_dependency_block(builder: &mut GateGraphBuilder, raw_line: &str, line_no: usize) -> ParseResult<()> {
    let tokens: Vec<String> = raw_line.split_whitespace().map(str::to_string).collect();
    if tokens.first().map(String::as_str) != Some(DEPENDENCY_STRING) || tokens.last().map(String::as_str) != Some("0") {
        return Err(malformed(line_no, "dependency line must be 'd <var> <deps...> 0'"));
    }
    if tokens.len() < 3 {
        return Err(malformed(line_no, "dependency block needs a variable and a terminator"));
    }
    let variable_id = &tokens[1];
    let dependency_ids = &tokens[2..tokens.len() - 1];
    builder.dependency(variable_id, dependency_ids, line_no)
}

fn malformed(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::MalformedLine { line, message: message.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_dependency_line_with_spaces() {
        let text = "#QCIR-G14\nforall(x)\nexists(y)\nd y x 0\ng = and(x,y)\noutput(g)\n";
        let (graph, deps) = parse(Cursor::new(text)).unwrap();
        let x = graph.alias_of("x").unwrap();
        let y = graph.alias_of("y").unwrap();
        assert_eq!(deps.get(y), Some(&[x][..]));
    }
}
