//! Polarity-aware Tseitin CNF encoding of a gate graph.

use unique_ir::{GateGraph, GateKind, GatePolarity, Literal};

use crate::error::{CompileError, CompileResult};

/// A CNF formula: clauses over aliases `1..=num_vars`.
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    pub clauses: Vec<Vec<Literal>>,
    pub num_vars: u32,
}

impl Cnf {
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
}

/// Encode every reachable `And`/`Or` gate as Tseitin clauses under the
/// propagated polarity of `output_polarity`, then append the output unit
/// clause unless `add_output_unit` is false (the Tseitin-complete mode
/// used internally by the extractor, which decides separately whether
/// and how to assert the output).
pub fn build(
    graph: &GateGraph,
    output_polarity: GatePolarity,
    negate: bool,
    add_output_unit: bool,
) -> CompileResult<Cnf> {
    let output = graph.output_alias().ok_or(CompileError::MissingOutput)?;
    let polarities = graph.polarities(output_polarity);

    let mut clauses = Vec::new();
    for alias in graph.all_aliases() {
        let gate = graph.gate(alias);
        if !gate.is_and_or() {
            continue;
        }
        let p = polarities[usize::from(alias)];
        if p == GatePolarity::None {
            continue;
        }
        let g = Literal::new(alias, false);
        match gate.kind {
            GateKind::And => {
                if p != GatePolarity::Negative {
                    for &l in &gate.inputs {
                        clauses.push(vec![l, g.negate()]);
                    }
                }
                if p != GatePolarity::Positive {
                    let mut clause: Vec<Literal> = gate.inputs.iter().map(|l| l.negate()).collect();
                    clause.push(g);
                    clauses.push(clause);
                }
            }
            GateKind::Or => {
                if p != GatePolarity::Positive {
                    for &l in &gate.inputs {
                        clauses.push(vec![l.negate(), g]);
                    }
                }
                if p != GatePolarity::Negative {
                    let mut clause: Vec<Literal> = gate.inputs.clone();
                    clause.push(g.negate());
                    clauses.push(clause);
                }
            }
            _ => return Err(CompileError::NotAGate(alias)),
        }
    }

    if add_output_unit {
        clauses.push(vec![Literal::new(output, negate)]);
    }

    Ok(Cnf {
        clauses,
        num_vars: graph.max_alias(),
    })
}

/// Encode a gate graph that originated from DIMACS clauses: `Or` gates
/// are the original clauses and are emitted verbatim, without a Tseitin
/// definition for the gate alias itself; the synthetic output `And`
/// gate is never emitted as a clause body.
pub fn build_raw(graph: &GateGraph, negate: bool) -> CompileResult<Cnf> {
    let output = graph.output_alias().ok_or(CompileError::MissingOutput)?;
    let mut clauses = Vec::new();
    for alias in graph.all_aliases() {
        if alias == output {
            continue;
        }
        let gate = graph.gate(alias);
        if gate.kind == GateKind::Or {
            clauses.push(gate.inputs.clone());
        }
    }
    if negate {
        clauses.push(vec![Literal::new(output, true)]);
    }
    Ok(Cnf {
        clauses,
        num_vars: graph.max_alias(),
    })
}

/// Tseitin-encode only `graph.definition_aliases()` at `Both` polarity,
/// with no output unit — the body of the standalone DIMACS emitter,
/// useful for downstream circuit analysis of the extracted definitions
/// alone.
pub fn build_definition_clauses(graph: &GateGraph) -> Cnf {
    let mut clauses = Vec::new();
    for &alias in graph.definition_aliases() {
        let gate = graph.gate(alias);
        let g = Literal::new(alias, false);
        match gate.kind {
            GateKind::And => {
                for &l in &gate.inputs {
                    clauses.push(vec![l, g.negate()]);
                }
                let mut clause: Vec<Literal> = gate.inputs.iter().map(|l| l.negate()).collect();
                clause.push(g);
                clauses.push(clause);
            }
            GateKind::Or => {
                for &l in &gate.inputs {
                    clauses.push(vec![l.negate(), g]);
                }
                let mut clause: Vec<Literal> = gate.inputs.clone();
                clause.push(g.negate());
                clauses.push(clause);
            }
            _ => {}
        }
    }
    Cnf {
        clauses,
        num_vars: graph.max_alias(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unique_ir::VariableType;

    fn and_graph() -> GateGraph {
        let mut g = GateGraph::new();
        g.begin_quantifier_block();
        g.add_variable("1", VariableType::Existential).unwrap();
        g.add_variable("2", VariableType::Existential).unwrap();
        g.add_gate("3", GateKind::And, &["1".to_string(), "2".to_string()]).unwrap();
        g.set_output_id("3");
        g
    }

    #[test]
    fn positive_and_gets_forward_clauses_and_unit() {
        let g = and_graph();
        let cnf = build(&g, GatePolarity::Positive, false, true).unwrap();
        // (1 v -3), (2 v -3), unit(3)
        assert_eq!(cnf.num_clauses(), 3);
        assert!(cnf.clauses.iter().any(|c| c.len() == 1 && c[0].0 == 3));
    }

    #[test]
    fn both_polarity_adds_backward_clause_too() {
        let g = and_graph();
        let cnf = build(&g, GatePolarity::Both, false, true).unwrap();
        // 2 forward + 1 backward + unit
        assert_eq!(cnf.num_clauses(), 4);
    }

    #[test]
    fn raw_mode_emits_clause_gates_only() {
        let mut g = GateGraph::new();
        g.begin_quantifier_block();
        g.add_variable("1", VariableType::Existential).unwrap();
        g.add_variable("2", VariableType::Existential).unwrap();
        g.add_gate("3", GateKind::Or, &["1".to_string(), "2".to_string()]).unwrap();
        g.add_gate("4", GateKind::And, &["3".to_string()]).unwrap();
        g.set_output_id("4");
        let cnf = build_raw(&g, false).unwrap();
        assert_eq!(cnf.num_clauses(), 1);
        assert_eq!(cnf.clauses[0].len(), 2);
    }
}
