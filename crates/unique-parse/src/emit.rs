//! Writers for the four output formats the CLI exposes. A graph that
//! carries a non-empty [`DependencyMap`] automatically grows the `d`
//! lines a DQCIR/DQDIMACS reader would expect — mirroring the
//! original's virtual-dispatch behavior without a separate "DQ" output
//! format.

use std::io::{self, Write};

use unique_ir::{Alias, DependencyMap, GateGraph, GateKind, Literal};
use unique_solve::matrix;

use crate::error::ParseResult;

fn literal_string(graph: &GateGraph, lit: Literal) -> String {
    let sign = if lit.is_negated() { "-" } else { "" };
    format!("{sign}{}", graph.gate(lit.alias()).id)
}

fn paste<T: AsRef<str>>(out: &mut dyn Write, items: &[T], separator: &str) -> io::Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(out, "{separator}")?;
        }
        write!(out, "{}", item.as_ref())?;
    }
    Ok(())
}

fn print_clauses(graph: &GateGraph, clauses: &[Vec<Literal>], out: &mut dyn Write) -> io::Result<()> {
    for clause in clauses {
        for &lit in clause {
            write!(out, "{} ", literal_string(graph, lit))?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

// ---- QCIR / DQCIR -----------------------------------------------------

/// `#QCIR-G14` prefix, grouping consecutive same-kind quantifier blocks;
/// DQBF existentials carrying an explicit depset are excluded (they
/// get a `d` line instead, printed by [`print_dependency_blocks`]).
fn print_qcir_prefix(graph: &GateGraph, deps: &DependencyMap, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "#QCIR-G14")?;
    let mut last_block = GateKind::None;
    let mut seen = false;
    for alias in graph.variables() {
        let gate = graph.gate(alias);
        let in_prefix = (gate.kind == GateKind::Existential && !deps.contains(alias)) || gate.kind == GateKind::Universal;
        if !in_prefix {
            continue;
        }
        if gate.kind != last_block {
            last_block = gate.kind;
            if seen {
                writeln!(out, ")")?;
            }
            let keyword = if gate.kind == GateKind::Existential { "exists" } else { "forall" };
            write!(out, "{keyword}({}", gate.id)?;
        } else {
            write!(out, ", {}", gate.id)?;
        }
        seen = true;
    }
    if seen {
        writeln!(out, ")")?;
    }
    let output = graph.output_alias().expect("output set before emission");
    writeln!(out, "output({})", graph.gate(output).id)
}

fn print_dependency_blocks(graph: &GateGraph, deps: &DependencyMap, out: &mut dyn Write) -> io::Result<()> {
    for alias in graph.variables() {
        if graph.gate(alias).kind != GateKind::Existential {
            continue;
        }
        if let Some(depset) = deps.get(alias) {
            write!(out, "d {} ", graph.gate(alias).id)?;
            for &dep in depset {
                write!(out, "{} ", graph.gate(dep).id)?;
            }
            writeln!(out, "0")?;
        }
    }
    Ok(())
}

fn print_qcir_gates(graph: &GateGraph, out: &mut dyn Write) -> io::Result<()> {
    for alias in graph.topological_order() {
        let gate = graph.gate(alias);
        let keyword = match gate.kind {
            GateKind::And => "and",
            GateKind::Or => "or",
            _ => continue,
        };
        write!(out, "{} = {keyword}(", gate.id)?;
        let inputs: Vec<String> = gate.inputs.iter().map(|&l| literal_string(graph, l)).collect();
        paste(out, &inputs, ", ")?;
        writeln!(out, ")")?;
    }
    Ok(())
}

/// Write QCIR, adding `d` lines when `deps` is non-empty (DQCIR).
pub fn write_qcir<W: Write>(graph: &GateGraph, deps: &DependencyMap, mut out: W) -> ParseResult<()> {
    print_qcir_prefix(graph, deps, &mut out)?;
    if !deps.is_empty() {
        print_dependency_blocks(graph, deps, &mut out)?;
    }
    print_qcir_gates(graph, &mut out)?;
    Ok(())
}

// ---- QDIMACS / DQDIMACS -----------------------------------------------

fn print_qdimacs_prefix(graph: &GateGraph, deps: &DependencyMap, out: &mut dyn Write) -> io::Result<()> {
    let mut last_block = GateKind::None;
    let mut seen = false;
    for alias in graph.variables() {
        let gate = graph.gate(alias);
        let in_prefix = !deps.contains(alias) && (gate.kind == GateKind::Existential || gate.kind == GateKind::Universal);
        if !in_prefix {
            continue;
        }
        if gate.kind != last_block {
            last_block = gate.kind;
            if seen {
                writeln!(out, "0")?;
            }
            let keyword = if gate.kind == GateKind::Existential { "e" } else { "a" };
            write!(out, "{keyword} ")?;
        }
        write!(out, "{} ", gate.id)?;
        seen = true;
    }

    let output = graph.output_alias();
    let and_gates: Vec<Alias> = graph
        .all_aliases()
        .filter(|&a| graph.gate(a).kind == GateKind::And && Some(a) != output)
        .collect();
    if !and_gates.is_empty() {
        if last_block == GateKind::Universal {
            writeln!(out, "0")?;
            write!(out, "e ")?;
        }
        for alias in and_gates {
            write!(out, "{} ", graph.gate(alias).id)?;
        }
    }
    if seen {
        writeln!(out, "0")?;
    }
    Ok(())
}

/// Write QDIMACS, adding `d` lines when `deps` is non-empty (DQDIMACS).
///
/// `dimacs_origin` mirrors the original's `addToClauseList`/`addOutputUnit`
/// virtual dispatch: a graph parsed from QDIMACS/DQDIMACS already has its
/// clauses as raw `Or` gates and needs no output unit (the clauses alone
/// are the constraints), so it goes through [`matrix::build_raw`]; a graph
/// parsed from QCIR/DQCIR needs the normal one-sided Tseitin encoding with
/// the output asserted true.
pub fn write_qdimacs<W: Write>(graph: &GateGraph, deps: &DependencyMap, dimacs_origin: bool, mut out: W) -> ParseResult<()> {
    let cnf = if dimacs_origin {
        matrix::build_raw(graph, false)
    } else {
        matrix::build(graph, unique_ir::GatePolarity::Positive, false, true)
    }
    .map_err(|e| crate::error::ParseError::MalformedHeader(e.to_string()))?;
    write!(out, "c defined variables: ")?;
    for id in graph.defined_ids() {
        write!(out, "{id} ")?;
    }
    writeln!(out)?;
    writeln!(out, "p cnf {} {}", graph.max_id_number(), cnf.num_clauses())?;
    print_qdimacs_prefix(graph, deps, &mut out)?;
    if !deps.is_empty() {
        print_dependency_blocks(graph, deps, &mut out)?;
    }
    print_clauses(graph, &cnf.clauses, &mut out)?;
    Ok(())
}

// ---- DIMACS -------------------------------------------------------------

/// Standalone CNF over the extracted definitions only, with no
/// quantifier prefix — useful for feeding downstream circuit tools.
pub fn write_dimacs<W: Write>(graph: &GateGraph, mut out: W) -> ParseResult<()> {
    let cnf = matrix::build_definition_clauses(graph);
    write!(out, "c defined variables: ")?;
    for id in graph.defined_ids() {
        write!(out, "{id} ")?;
    }
    writeln!(out)?;
    writeln!(out, "p cnf {} {}", graph.max_id_number(), cnf.num_clauses())?;
    print_clauses(graph, &cnf.clauses, &mut out)?;
    Ok(())
}

// ---- Verilog -------------------------------------------------------------

fn print_and_or_gate_verilog(graph: &GateGraph, alias: Alias, out: &mut dyn Write) -> io::Result<()> {
    let gate = graph.gate(alias);
    write!(out, "assign v_{} = ", gate.id)?;
    if gate.inputs.is_empty() {
        write!(out, "{}", if gate.kind == GateKind::And { "1" } else { "0" })?;
    } else {
        let separator = if gate.kind == GateKind::And { " & " } else { " | " };
        let operands: Vec<String> = gate
            .inputs
            .iter()
            .map(|&l| {
                let sign = if l.is_negated() { "~" } else { "" };
                format!("{sign}v_{}", graph.gate(l.alias()).id)
            })
            .collect();
        paste(out, &operands, separator)?;
    }
    writeln!(out, ";")
}

/// Write a Verilog module whose inputs are the surviving prefix
/// variables, outputs are the variables a definition was spliced onto,
/// and wires are the auxiliary gates introduced along the way.
pub fn write_verilog<W: Write>(graph: &GateGraph, mut out: W) -> ParseResult<()> {
    let mut input_ids = Vec::new();
    let mut output_ids = Vec::new();
    for alias in graph.variables() {
        let gate = graph.gate(alias);
        if gate.kind == GateKind::Existential || gate.kind == GateKind::Universal {
            input_ids.push(format!("v_{}", gate.id));
        } else {
            output_ids.push(format!("v_{}", gate.id));
        }
    }
    let boundary = graph.variable_gate_boundary();
    let auxiliary_ids: Vec<String> = graph
        .definition_aliases()
        .iter()
        .filter(|&&a| a >= boundary)
        .map(|&a| format!("v_{}", graph.gate(a).id))
        .collect();

    write!(out, "module definitions(")?;
    paste(&mut out, &input_ids, ", ")?;
    write!(out, ", ")?;
    paste(&mut out, &output_ids, ", ")?;
    writeln!(out, ");")?;
    if !input_ids.is_empty() {
        write!(out, "input ")?;
        paste(&mut out, &input_ids, ", ")?;
        writeln!(out, ";")?;
    }
    write!(out, "output ")?;
    paste(&mut out, &output_ids, ", ")?;
    writeln!(out, ";")?;
    if !auxiliary_ids.is_empty() {
        write!(out, "wire ")?;
        paste(&mut out, &auxiliary_ids, ", ")?;
        writeln!(out, ";")?;
    }
    for &alias in graph.definition_aliases() {
        print_and_or_gate_verilog(graph, alias, &mut out)?;
    }
    writeln!(out, "endmodule")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use unique_ir::VariableType;

    fn xor_graph() -> GateGraph {
        let mut g = GateGraph::new();
        g.begin_quantifier_block();
        g.add_variable("1", VariableType::Existential).unwrap();
        g.add_variable("2", VariableType::Existential).unwrap();
        g.add_gate("3", GateKind::And, &["-1".to_string(), "2".to_string()]).unwrap();
        g.add_gate("4", GateKind::And, &["1".to_string(), "-2".to_string()]).unwrap();
        g.add_gate("5", GateKind::Or, &["3".to_string(), "4".to_string()]).unwrap();
        g.set_output_id("5");
        g
    }

    #[test]
    fn qcir_roundtrips_prefix_and_output() {
        let g = xor_graph();
        let mut buf = Vec::new();
        write_qcir(&g, &DependencyMap::new(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("#QCIR-G14\nexists(1, 2)\n"));
        assert!(text.contains("output(5)"));
    }

    #[test]
    fn qdimacs_dimacs_origin_emits_raw_clauses_with_no_output_unit() {
        let text = "p cnf 3 4\ne 1 2 3 0\n1 2 -3 0\n1 -2 3 0\n-1 2 3 0\n-1 -2 -3 0\n";
        let (graph, deps) = crate::qdimacs::parse(std::io::Cursor::new(text)).unwrap();

        let mut buf = Vec::new();
        write_qdimacs(&graph, &deps, true, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        // Four raw clauses, no synthetic output unit, no undeclared aliases
        // beyond the three declared existentials.
        assert!(text.contains("p cnf 3 4"));
        assert!(text.contains("1 2 -3 0"));
        assert!(text.contains("1 -2 3 0"));
        assert!(text.contains("-1 2 3 0"));
        assert!(text.contains("-1 -2 -3 0"));
        assert!(!text.contains(" 4 0") && !text.contains("-4 0"));
    }

    #[test]
    fn verilog_emits_assign_for_xor() {
        let mut g = xor_graph();
        g.mark_defined(Alias(3));
        let mut buf = Vec::new();
        write_verilog(&g, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("assign v_5 = v_3 | v_4;"));
    }
}
