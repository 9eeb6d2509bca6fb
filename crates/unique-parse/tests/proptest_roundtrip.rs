//! Property-based tests for QCIR roundtrip conversion.
//!
//! Tests that gate graph -> QCIR text -> gate graph preserves every
//! gate's kind and inputs.

use proptest::prelude::*;

use unique_ir::{DependencyMap, GateGraph, GateKind, Literal, VariableType};
use unique_parse::{emit, qcir};

/// A random CNF-shaped instance over `num_vars` existential variables:
/// `num_clauses` OR-gates, each over 1-3 signed literals, ANDed together
/// as the output.
#[derive(Debug, Clone)]
struct Instance {
    num_vars: u32,
    clauses: Vec<Vec<i32>>,
}

fn arb_instance() -> impl Strategy<Value = Instance> {
    (2_u32..=4).prop_flat_map(|num_vars| {
        let literal = (1_i32..=num_vars as i32).prop_flat_map(|v| prop_oneof![Just(v), Just(-v)]);
        let clause = prop::collection::vec(literal, 1..=3);
        (Just(num_vars), prop::collection::vec(clause, 1..=3)).prop_map(|(num_vars, clauses)| Instance { num_vars, clauses })
    })
}

fn build_graph(instance: &Instance) -> GateGraph {
    let mut g = GateGraph::new();
    g.begin_quantifier_block();
    for v in 1..=instance.num_vars {
        g.add_variable(&v.to_string(), VariableType::Existential).unwrap();
    }
    let mut clause_ids = Vec::new();
    for (i, clause) in instance.clauses.iter().enumerate() {
        let id = format!("c{i}");
        let literals: Vec<String> = clause.iter().map(|l| l.to_string()).collect();
        g.add_gate(&id, GateKind::Or, &literals).unwrap();
        clause_ids.push(id);
    }
    g.add_gate("m", GateKind::And, &clause_ids).unwrap();
    g.set_output_id("m");
    g
}

/// Every alias present in `before` keeps the same kind and inputs in
/// `after` — both graphs were built from the same sequence of ids, so
/// ids resolve to identical aliases in both.
fn assert_graphs_match(before: &GateGraph, after: &GateGraph) {
    assert_eq!(before.max_alias(), after.max_alias());
    for alias in before.variables().chain(
        (before.variable_gate_boundary().get()..=before.max_alias())
            .map(unique_ir::Alias::from)
            .filter(|&a| before.gate(a).kind != GateKind::None),
    ) {
        let gb = before.gate(alias);
        let ga = after.gate(alias);
        assert_eq!(gb.kind, ga.kind, "alias {alias} kind mismatch");
        let as_pairs = |lits: &[Literal]| -> Vec<(u32, bool)> { lits.iter().map(|l| (l.alias().get(), l.is_negated())).collect() };
        assert_eq!(as_pairs(&gb.inputs), as_pairs(&ga.inputs), "alias {alias} inputs mismatch");
    }
}

proptest! {
    #[test]
    fn qcir_roundtrip_preserves_gate_structure(instance in arb_instance()) {
        let graph = build_graph(&instance);

        let mut buf = Vec::new();
        emit::write_qcir(&graph, &DependencyMap::new(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let (roundtripped, deps) = qcir::parse(std::io::Cursor::new(text)).unwrap();
        prop_assert!(deps.is_empty());
        assert_graphs_match(&graph, &roundtripped);
    }
}
