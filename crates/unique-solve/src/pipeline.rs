//! Top-level driver tying [`selector`] and [`extractor`] together over
//! a whole input: the QBF case tests existentials then universals, the
//! DQBF case tests ordinary existentials then each dependency group,
//! splicing every discovered definition back into the graph as it goes.

use rustc_hash::FxHashMap;
use tracing::info;

use unique_ir::{DependencyMap, GateGraph, GateId, VariableType};

use crate::error::CompileResult;
use crate::extractor::{compute_definitions, get_definitions, splice_definitions, CancellationToken};
use crate::selector::{self, QuerySet};
use crate::solver::InterpolatingSolver;

/// Run one `(query_set, negate)` pass, splicing any definitions back
/// into `graph` (done internally by [`get_definitions`]) and reporting
/// how many of `query_set`'s masked entries were resolved.
fn run_pass<S: InterpolatingSolver>(
    graph: &mut GateGraph,
    query_set: &QuerySet,
    use_same_type: bool,
    negate: bool,
    conflict_limit: u32,
    auxiliary_start: &mut u32,
    cancel: &CancellationToken,
) -> CompileResult<usize> {
    let max_var = graph.max_alias();
    let result = get_definitions::<S>(graph, query_set, use_same_type, negate, conflict_limit, max_var, auxiliary_start, cancel)?;
    Ok(result.defined.len())
}

/// Run the whole extraction pipeline over `graph`. `deps` is empty for
/// plain QBF input; non-empty for DQBF input, in which case the
/// universal pass is skipped entirely (DQBF has no Herbrand-function
/// test for universals) and one extra pass runs per explicit
/// dependency group.
///
/// For the QBF case, the existential and universal passes are both
/// computed against the pristine matrix before either one splices a
/// definition back in — mirroring `doGetDefinitions`, which computes
/// both passes first and only calls `addDefinitions` afterward.
/// Splicing the existential pass first would turn defined existentials
/// into `And` gates the universal pass's matrix build would then see,
/// changing which universals end up provably defined.
pub fn run<S: InterpolatingSolver>(
    graph: &mut GateGraph,
    deps: &DependencyMap,
    use_same_type: bool,
    conflict_limit: u32,
    ordering: Option<&FxHashMap<GateId, usize>>,
    cancel: &CancellationToken,
) -> CompileResult<()> {
    let mut auxiliary_start = graph.max_alias() + 1;
    let dqbf = !deps.is_empty();

    let existential_deps = if dqbf { Some(deps) } else { None };
    let mut existential = selector::select(graph, VariableType::Existential, existential_deps);
    if let Some(ordering) = ordering {
        selector::apply_ordering(&mut existential.query, graph, ordering);
    }

    if dqbf {
        let existential_defined = run_pass::<S>(graph, &existential, use_same_type, false, conflict_limit, &mut auxiliary_start, cancel)?;
        info!(
            "{} of {} existential variables uniquely determined",
            existential_defined,
            graph.number_variables(VariableType::Existential)
        );

        let mut total_dependent_defined = 0usize;
        for mut group in selector::select_dependent_groups(deps) {
            if let Some(ordering) = ordering {
                selector::apply_ordering(&mut group.query, graph, ordering);
            }
            total_dependent_defined += run_pass::<S>(graph, &group, use_same_type, false, conflict_limit, &mut auxiliary_start, cancel)?;
        }
        info!("{} variables with explicit dependencies uniquely determined", total_dependent_defined);
    } else {
        let mut universal = selector::select(graph, VariableType::Universal, None);
        if let Some(ordering) = ordering {
            selector::apply_ordering(&mut universal.query, graph, ordering);
        }

        let max_var = graph.max_alias();
        let existential_extraction =
            compute_definitions::<S>(graph, &existential, use_same_type, false, conflict_limit, max_var, cancel)?;
        let universal_extraction = compute_definitions::<S>(graph, &universal, use_same_type, true, conflict_limit, max_var, cancel)?;

        let existential_result = splice_definitions(graph, &existential_extraction, &mut auxiliary_start)?;
        let universal_result = splice_definitions(graph, &universal_extraction, &mut auxiliary_start)?;

        info!(
            "{} of {} existential variables uniquely determined",
            existential_result.defined.len(),
            graph.number_variables(VariableType::Existential)
        );
        info!(
            "{} of {} universal variables uniquely determined",
            universal_result.defined.len(),
            graph.number_variables(VariableType::Universal)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference_solver::ReferenceSolver;
    use unique_ir::{Alias, GateKind, VariableType};

    #[test]
    fn qbf_pipeline_splices_xor_definition() {
        let mut g = GateGraph::new();
        g.begin_quantifier_block();
        g.add_variable("1", VariableType::Existential).unwrap();
        g.add_variable("2", VariableType::Existential).unwrap();
        g.add_variable("3", VariableType::Existential).unwrap();
        g.add_gate("c1", GateKind::Or, &["-1".to_string(), "-2".to_string(), "3".to_string()]).unwrap();
        g.add_gate("c2", GateKind::Or, &["1".to_string(), "2".to_string(), "3".to_string()]).unwrap();
        g.add_gate("c3", GateKind::Or, &["-1".to_string(), "2".to_string(), "-3".to_string()]).unwrap();
        g.add_gate("c4", GateKind::Or, &["1".to_string(), "-2".to_string(), "-3".to_string()]).unwrap();
        g.add_gate("m", GateKind::And, &["c1".to_string(), "c2".to_string(), "c3".to_string(), "c4".to_string()]).unwrap();
        g.set_output_id("m");

        let cancel = CancellationToken::new();
        run::<ReferenceSolver>(&mut g, &DependencyMap::new(), true, 1000, None, &cancel).unwrap();

        assert_eq!(g.gate(Alias(3)).kind, GateKind::And);
    }

    #[test]
    fn dqbf_pipeline_runs_dependent_group_without_universal_pass() {
        let mut g = GateGraph::new();
        g.begin_quantifier_block();
        g.add_variable("1", VariableType::Universal).unwrap();
        g.begin_quantifier_block();
        g.add_variable("2", VariableType::Existential).unwrap();
        g.add_variable("3", VariableType::Existential).unwrap();
        g.add_gate("g", GateKind::Or, &["-2".to_string(), "3".to_string()]).unwrap();
        g.set_output_id("g");

        let mut deps = DependencyMap::new();
        deps.insert(Alias(3), vec![Alias(2)]);

        let cancel = CancellationToken::new();
        // Must not panic: the universal pass is skipped entirely for
        // DQBF input, and the single dependent group is tested instead.
        run::<ReferenceSolver>(&mut g, &deps, true, 1000, None, &cancel).unwrap();
    }
}
