//! Partitions prefix variables into a *defining* (shared) set and a
//! *query* set, per the quantifier semantics being tested.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use unique_ir::{Alias, DependencyMap, GateGraph, GateId, VariableType};

/// Result of a selection run: candidates to test (`query`, with a
/// per-entry `mask` saying whether that entry should actually be tried),
/// and the variables that may appear in an extracted definition (`shared`).
#[derive(Debug, Clone)]
pub struct QuerySet {
    pub shared: Vec<Alias>,
    pub query: Vec<Alias>,
    pub mask: Vec<bool>,
}

/// Select shared/query sets for ordinary (non-dependent) variables of
/// kind `t`. `deps` is `Some` for DQBF input, in which case existentials
/// that carry an explicit `d`-line are excluded from `query` (they are
/// handled by [`select_dependent_groups`] instead) and the lenient
/// "stop at the first non-outermost existential" rule applies.
pub fn select(graph: &GateGraph, t: VariableType, deps: Option<&DependencyMap>) -> QuerySet {
    let variables: Vec<Alias> = graph.variables().collect();
    let kind_of = |a: Alias| graph.gate(a).kind;

    let split_at = match t {
        VariableType::Universal => {
            let mut seen_existential = false;
            let mut idx = variables.len();
            for (i, &v) in variables.iter().enumerate() {
                let k = kind_of(v);
                if k.is_variable() && k == unique_ir::GateKind::Universal && seen_existential {
                    idx = i;
                    break;
                }
                if k == unique_ir::GateKind::Existential {
                    seen_existential = true;
                }
            }
            idx
        }
        VariableType::Existential => {
            let mut idx = variables.len();
            if deps.is_some() {
                // DQBF ordinary existentials: stop at the first existential
                // that follows a universal.
                let mut seen_universal = false;
                for (i, &v) in variables.iter().enumerate() {
                    let k = kind_of(v);
                    if k == unique_ir::GateKind::Existential && seen_universal {
                        idx = i;
                        break;
                    }
                    if k == unique_ir::GateKind::Universal {
                        seen_universal = true;
                    }
                }
            } else {
                // Plain QBF: stop at the first existential, period.
                for (i, &v) in variables.iter().enumerate() {
                    if kind_of(v) == unique_ir::GateKind::Existential {
                        idx = i;
                        break;
                    }
                }
            }
            idx
        }
    };

    let shared = variables[..split_at].to_vec();
    let mut query: Vec<Alias> = variables[split_at..].to_vec();
    if let Some(deps) = deps {
        query.retain(|&v| !deps.contains(v));
    }
    let mask = query
        .iter()
        .map(|&v| kind_of(v) == t.gate_kind())
        .collect();

    QuerySet { shared, query, mask }
}

/// Dependent-existential variant: one `QuerySet` per non-empty depset,
/// `shared = depset`, `query = reverse_deps[depset]`, `mask` all true.
pub fn select_dependent_groups(deps: &DependencyMap) -> Vec<QuerySet> {
    deps.reverse_groups()
        .filter(|(depset, _)| !depset.is_empty())
        .map(|(depset, vars)| QuerySet {
            shared: depset.to_vec(),
            mask: vec![true; vars.len()],
            query: vars.to_vec(),
        })
        .collect()
}

/// Reorder `query` per a user-supplied variable ordering: entries
/// present in `ordering` precede absent ones; ties inside the ordering
/// resolve by its index; ties outside resolve by ascending alias.
pub fn apply_ordering(query: &mut [Alias], graph: &GateGraph, ordering: &FxHashMap<GateId, usize>) {
    let priority = |a: Alias| ordering.get(&graph.gate(a).id).copied();
    query.sort_by(|&x, &y| match (priority(x), priority(y)) {
        (Some(ix), Some(iy)) => ix.cmp(&iy),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => x.cmp(&y),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use unique_ir::GateKind;

    fn prefix(kinds: &[VariableType]) -> GateGraph {
        let mut g = GateGraph::new();
        for (i, k) in kinds.iter().enumerate() {
            g.begin_quantifier_block();
            g.add_variable(&(i + 1).to_string(), *k).unwrap();
        }
        g
    }

    #[test]
    fn universal_query_stops_after_existential_block() {
        use VariableType::*;
        let g = prefix(&[Existential, Existential, Universal, Existential]);
        let qs = select(&g, Universal, None);
        // x1,x2 existential (outermost), z universal -> shared=[x1,x2,z]? No:
        // z is Universal but seen_existential is true already at z, so it's
        // excluded and query starts at z.
        assert_eq!(qs.shared.len(), 2);
        assert_eq!(qs.query.len(), 2);
        assert_eq!(qs.mask, vec![true, false]);
    }

    #[test]
    fn plain_existential_query_stops_at_first_existential() {
        use VariableType::*;
        let g = prefix(&[Universal, Existential, Universal]);
        let qs = select(&g, Existential, None);
        assert_eq!(qs.shared.len(), 1);
        assert_eq!(qs.query.len(), 2);
        assert_eq!(qs.mask, vec![true, false]);
    }

    #[test]
    fn ordering_prefers_listed_then_index_then_alias() {
        let g = prefix(&[VariableType::Existential; 4]);
        let aliases: Vec<Alias> = g.variables().collect();
        let mut ordering = FxHashMap::default();
        ordering.insert("2".to_string(), 0usize);
        ordering.insert("1".to_string(), 1usize);
        let mut query = aliases.clone();
        apply_ordering(&mut query, &g, &ordering);
        let ids: Vec<&str> = query.iter().map(|&a| g.gate(a).id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn dependent_groups_skip_empty_depsets() {
        let mut deps = DependencyMap::new();
        deps.insert(Alias(3), vec![Alias(1)]);
        deps.insert(Alias(4), vec![]);
        let groups = select_dependent_groups(&deps);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].shared, vec![Alias(1)]);
        assert_eq!(groups[0].query, vec![Alias(3)]);
    }

    #[test]
    fn mask_tracks_requested_kind() {
        let g = prefix(&[VariableType::Universal, VariableType::Existential]);
        assert!(matches!(g.gate(Alias(1)).kind, GateKind::Universal));
    }
}
