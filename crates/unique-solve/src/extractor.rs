//! Definition extraction: the core Padoa/Craig-interpolation driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument, warn};

use unique_ir::{Alias, GateGraph, Literal};

use crate::error::CompileResult;
use crate::matrix::{self, Cnf};
use crate::selector::QuerySet;
use crate::solver::{AigLit, ClauseLabel, InterpolatingSolver};

/// Cooperative cancellation handle, shared between a signal handler and
/// the extractor's inner loop. No background threads: the flag is only
/// ever observed, never blocked on.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-candidate extraction outcome: which query variables were shown
/// uniquely determined, and the `(inputs, out_alias)` pairs ready for
/// [`unique_ir::GateGraph::splice_definition`].
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub defined: Vec<Alias>,
    pub definitions: Vec<(Vec<Literal>, Alias)>,
    pub interrupted: bool,
}

/// The result of [`compute_definitions`]: which query variables were
/// shown uniquely determined against the matrix as it stood at query
/// time, plus the AIG needed to splice them in later. Kept separate
/// from splicing so a caller can run several query sets against the
/// same pristine matrix before committing any of their definitions —
/// mirroring `QBFParser::doGetDefinitions`, which computes both the
/// existential and universal passes before calling `addDefinitions`.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub defined: Vec<Alias>,
    pub shared: Vec<Alias>,
    pub aig: Option<crate::solver::Aig>,
    pub interrupted: bool,
}

fn rename_cnf(cnf: &Cnf, shared: &[Alias], offset: u32) -> Cnf {
    let shared_set: rustc_hash::FxHashSet<Alias> = shared.iter().copied().collect();
    let clauses = cnf
        .clauses
        .iter()
        .map(|clause| {
            clause
                .iter()
                .map(|&lit| {
                    let alias = lit.alias();
                    if shared_set.contains(&alias) {
                        lit
                    } else {
                        Literal::new(Alias::from(alias.get() + offset), lit.is_negated())
                    }
                })
                .collect()
        })
        .collect();
    Cnf {
        clauses,
        num_vars: cnf.num_vars + offset,
    }
}

/// Run the Padoa extraction loop over one [`QuerySet`] against `graph`
/// as it currently stands, without splicing anything back in. Pair with
/// [`splice_definitions`] to commit the result, or call [`get_definitions`]
/// for the common case of computing and splicing in one step.
///
/// `negate` flips which side of Padoa's theorem is being tested:
/// existential definability asserts the matrix true (`negate = false`),
/// universal definability asserts its negation (`negate = true`) —
/// mirroring the two calls `getDefinitionsFor` makes for each type.
#[instrument(skip(graph, query_set), fields(query = query_set.query.len(), shared = query_set.shared.len()))]
pub fn compute_definitions<S: InterpolatingSolver>(
    graph: &GateGraph,
    query_set: &QuerySet,
    use_same_type: bool,
    negate: bool,
    conflict_limit: u32,
    max_var: u32,
    cancel: &CancellationToken,
) -> CompileResult<Extraction> {
    let m = max_var;
    let f = matrix::build(graph, unique_ir::GatePolarity::Both, negate, true)?;
    let queriable = query_set.mask.iter().filter(|&&b| b).count() as u32;

    let mut shared: Vec<Alias> = query_set.shared.clone();
    let f_prime = rename_cnf(&f, &shared, m);

    let mut solver = S::new(2 * m + 2 * queriable);
    solver.add_formula(&f, &f_prime);

    if !solver.solve() {
        warn!("matrix unsatisfiable, returning no definitions");
        return Ok(Extraction::default());
    }

    let mut defined = Vec::new();
    let mut interrupted = false;

    for (i, &v) in query_set.query.iter().enumerate() {
        if cancel.is_cancelled() {
            info!("extraction interrupted before variable {}", graph.gate(v).id);
            interrupted = true;
            break;
        }

        let mut just_defined = false;
        if query_set.mask[i] {
            let s_a = solver.fresh_variable();
            let s_b = solver.fresh_variable();
            let v_prime = Alias::from(v.get() + m);
            solver.add_clause(&[Literal::new(s_a, true), Literal::new(v, false)], ClauseLabel::A);
            solver.add_clause(&[Literal::new(s_b, true), Literal::new(v_prime, true)], ClauseLabel::B);

            let is_defined = solver.get_interpolant(v, &[s_a, s_b], &shared, conflict_limit);
            if is_defined {
                debug!("variable {} is uniquely determined", graph.gate(v).id);
                defined.push(v);
                just_defined = true;
            }
        }

        if !query_set.mask[i] || use_same_type || just_defined {
            let v_prime = Alias::from(v.get() + m);
            let eq1 = [Literal::new(v, false), Literal::new(v_prime, true)];
            let eq2 = [Literal::new(v, true), Literal::new(v_prime, false)];
            solver.add_clause(&eq1, ClauseLabel::Shared);
            solver.add_clause(&eq2, ClauseLabel::Shared);
            shared.push(v);
        }
    }

    if cancel.is_cancelled() {
        solver.interrupt();
        interrupted = true;
    }

    let aig = if defined.is_empty() { None } else { solver.get_circuit(&shared, !interrupted) };

    info!("{} of {} query variables defined", defined.len(), query_set.query.len());
    Ok(Extraction { defined, shared, aig, interrupted })
}

/// Splice an [`Extraction`]'s AIG into `graph`, producing the
/// `(inputs, out_alias)` pairs each defined variable was rewritten to.
///
/// `auxiliary_start` is threaded across repeated calls (once per
/// quantifier kind for QBF, once per dependency group for DQBF) so that
/// fresh AIG-node aliases never collide between calls.
pub fn splice_definitions(graph: &mut GateGraph, extraction: &Extraction, auxiliary_start: &mut u32) -> CompileResult<Definitions> {
    let mut definitions = Vec::new();
    if let Some(aig) = &extraction.aig {
        splice_aig(graph, aig, &extraction.shared, &extraction.defined, auxiliary_start, &mut definitions)?;
    }
    Ok(Definitions {
        defined: extraction.defined.clone(),
        definitions,
        interrupted: extraction.interrupted,
    })
}

/// Run the Padoa extraction loop over one [`QuerySet`], splicing any
/// discovered definitions back into `graph` immediately. Convenience
/// wrapper over [`compute_definitions`] + [`splice_definitions`] for
/// callers that don't need to defer splicing across multiple passes.
#[allow(clippy::too_many_arguments)]
pub fn get_definitions<S: InterpolatingSolver>(
    graph: &mut GateGraph,
    query_set: &QuerySet,
    use_same_type: bool,
    negate: bool,
    conflict_limit: u32,
    max_var: u32,
    auxiliary_start: &mut u32,
    cancel: &CancellationToken,
) -> CompileResult<Definitions> {
    let extraction = compute_definitions::<S>(graph, query_set, use_same_type, negate, conflict_limit, max_var, cancel)?;
    splice_definitions(graph, &extraction, auxiliary_start)
}

fn splice_aig(
    graph: &mut GateGraph,
    aig: &crate::solver::Aig,
    shared: &[Alias],
    defined: &[Alias],
    auxiliary_start: &mut u32,
    definitions: &mut Vec<(Vec<Literal>, Alias)>,
) -> CompileResult<()> {
    let mut node_alias: FxHashMap<u32, Alias> = FxHashMap::default();
    let mut const_true: Option<Alias> = None;

    let resolve = |lit: AigLit,
                   node_alias: &FxHashMap<u32, Alias>,
                   const_true: &mut Option<Alias>,
                   graph: &mut GateGraph,
                   auxiliary_start: &mut u32|
     -> CompileResult<Literal> {
        if lit.is_constant() {
            let alias = match const_true {
                Some(a) => *a,
                None => {
                    let a = Alias::from(*auxiliary_start);
                    *auxiliary_start += 1;
                    graph.splice_definition(Vec::new(), a)?;
                    *const_true = Some(a);
                    a
                }
            };
            Ok(Literal::new(alias, lit.negated))
        } else if aig.is_input(lit) {
            let shared_alias = shared[aig.input_index(lit) as usize];
            Ok(Literal::new(shared_alias, lit.negated))
        } else {
            Ok(Literal::new(node_alias[&lit.node], lit.negated))
        }
    };

    for node_id in aig.dfs_order() {
        let node = aig.node(node_id);
        let in0 = resolve(node.and0, &node_alias, &mut const_true, graph, auxiliary_start)?;
        let in1 = resolve(node.and1, &node_alias, &mut const_true, graph, auxiliary_start)?;
        let alias = Alias::from(*auxiliary_start);
        *auxiliary_start += 1;
        graph.splice_definition(vec![in0, in1], alias)?;
        node_alias.insert(node_id, alias);
    }

    for (i, &out_alias) in defined.iter().enumerate() {
        let input = resolve(aig.outputs[i], &node_alias, &mut const_true, graph, auxiliary_start)?;
        graph.splice_definition(vec![input], out_alias)?;
        graph.mark_defined(out_alias);
        definitions.push((vec![input], out_alias));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference_solver::ReferenceSolver;
    use crate::selector::QuerySet;
    use unique_ir::{GateKind, VariableType};

    #[test]
    fn xor_gate_variable_is_recovered_end_to_end() {
        let mut g = GateGraph::new();
        g.begin_quantifier_block();
        g.add_variable("1", VariableType::Existential).unwrap();
        g.add_variable("2", VariableType::Existential).unwrap();
        g.add_variable("3", VariableType::Existential).unwrap();
        // 3 <-> xor(1,2), encoded directly as the output gate via two OR gates
        // emulating the CNF from S2: reuse matrix directly instead, by
        // building the output as an AND over the four implication clauses
        // expressed as OR gates.
        g.add_gate("c1", GateKind::Or, &["-1".to_string(), "-2".to_string(), "3".to_string()]).unwrap();
        g.add_gate("c2", GateKind::Or, &["1".to_string(), "2".to_string(), "3".to_string()]).unwrap();
        g.add_gate("c3", GateKind::Or, &["-1".to_string(), "2".to_string(), "-3".to_string()]).unwrap();
        g.add_gate("c4", GateKind::Or, &["1".to_string(), "-2".to_string(), "-3".to_string()]).unwrap();
        g.add_gate("m", GateKind::And, &["c1".to_string(), "c2".to_string(), "c3".to_string(), "c4".to_string()]).unwrap();
        g.set_output_id("m");

        let query_set = QuerySet {
            shared: vec![Alias(1), Alias(2)],
            query: vec![Alias(3)],
            mask: vec![true],
        };
        let mut auxiliary_start = g.max_alias() + 1;
        let cancel = CancellationToken::new();
        let max_alias = g.max_alias();
        let result = get_definitions::<ReferenceSolver>(
            &mut g,
            &query_set,
            true,
            false,
            1000,
            max_alias,
            &mut auxiliary_start,
            &cancel,
        )
        .unwrap();

        assert_eq!(result.defined, vec![Alias(3)]);
        assert!(!result.interrupted);
        assert_eq!(g.gate(Alias(3)).kind, GateKind::And);
    }

    #[test]
    fn compute_definitions_does_not_mutate_graph() {
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

        let query_set = QuerySet {
            shared: vec![Alias(1), Alias(2)],
            query: vec![Alias(3)],
            mask: vec![true],
        };
        let max_var = g.max_alias();
        let cancel = CancellationToken::new();
        let extraction = compute_definitions::<ReferenceSolver>(&g, &query_set, true, false, 1000, max_var, &cancel).unwrap();

        assert_eq!(extraction.defined, vec![Alias(3)]);
        // Nothing spliced yet: the query variable is still an undefined
        // existential, exactly as a concurrently-computed universal pass
        // over the same pristine matrix would see it.
        assert_eq!(g.gate(Alias(3)).kind, GateKind::Existential);

        let mut auxiliary_start = g.max_alias() + 1;
        let result = splice_definitions(&mut g, &extraction, &mut auxiliary_start).unwrap();
        assert_eq!(result.defined, vec![Alias(3)]);
        assert_eq!(g.gate(Alias(3)).kind, GateKind::And);
    }

    #[test]
    fn cancellation_stops_before_next_candidate() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
