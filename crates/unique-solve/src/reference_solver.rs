//! A small, brute-force [`InterpolatingSolver`] used for tests and for
//! running the extractor end-to-end on toy instances. It is not a SAT
//! solver in any serious sense: satisfiability and interpolants are
//! computed by enumerating every assignment over the current variable
//! space, so cost is exponential in `max_var`. Good enough for the
//! handful of variables exercised by unit tests; never intended for
//! real inputs (a production build wires in a real solver behind the
//! same trait).

use std::collections::HashMap;

use unique_ir::{Alias, Literal};

use crate::matrix::Cnf;
use crate::solver::{Aig, AigLit, AigNode, ClauseLabel, InterpolatingSolver};

struct Recorded {
    assumption: i32,
}

pub struct ReferenceSolver {
    max_var: u32,
    a_clauses: Vec<Vec<i32>>,
    b_clauses: Vec<Vec<i32>>,
    shared_clauses: Vec<Vec<i32>>,
    recorded: Vec<Recorded>,
    interrupted: bool,
}

fn cnf_clauses(cnf: &Cnf) -> Vec<Vec<i32>> {
    cnf.clauses.iter().map(|c| c.iter().map(|l| l.0).collect()).collect()
}

fn clause_satisfied(clause: &[i32], assignment: &[bool]) -> bool {
    clause.iter().any(|&lit| {
        let var = lit.unsigned_abs() as usize;
        let value = assignment[var];
        if lit < 0 {
            !value
        } else {
            value
        }
    })
}

impl ReferenceSolver {
    fn all_clauses(&self) -> impl Iterator<Item = &Vec<i32>> {
        self.a_clauses.iter().chain(self.b_clauses.iter()).chain(self.shared_clauses.iter())
    }

    /// Enumerate every assignment over `1..=max_var` (after fixing
    /// `assumptions` as unit literals); return the first satisfying one.
    fn find_model(&self, assumptions: &[i32]) -> Option<Vec<bool>> {
        let n = self.max_var as usize;
        let total = 1u64.checked_shl(n as u32).unwrap_or(u64::MAX);
        'outer: for bits in 0..total {
            let mut assignment = vec![false; n + 1];
            for v in 1..=n {
                assignment[v] = (bits >> (v - 1)) & 1 == 1;
            }
            for &lit in assumptions {
                let var = lit.unsigned_abs() as usize;
                let want = lit > 0;
                if assignment[var] != want {
                    continue 'outer;
                }
            }
            for clause in self.all_clauses() {
                if !clause_satisfied(clause, &assignment) {
                    continue 'outer;
                }
            }
            return Some(assignment);
        }
        None
    }

    /// `true` for every assignment to `shared_vars` reachable from the
    /// A-side formula with `assumption` fixed true: the naive existential
    /// projection `∃Y. A(X, Y) ∧ assumption`, a valid Craig interpolant.
    fn a_side_table(&self, shared_vars: &[Alias], assumption: i32) -> HashMap<Vec<bool>, bool> {
        let n = self.max_var as usize;
        let mut table = HashMap::new();
        let total = 1u64.checked_shl(n as u32).unwrap_or(u64::MAX);
        for bits in 0..total {
            let mut assignment = vec![false; n + 1];
            for v in 1..=n {
                assignment[v] = (bits >> (v - 1)) & 1 == 1;
            }
            let unit_var = assumption.unsigned_abs() as usize;
            if assignment[unit_var] != (assumption > 0) {
                continue;
            }
            let ok = self
                .a_clauses
                .iter()
                .chain(self.shared_clauses.iter())
                .all(|c| clause_satisfied(c, &assignment));
            if !ok {
                continue;
            }
            let key: Vec<bool> = shared_vars.iter().map(|&a| assignment[a.get() as usize]).collect();
            table.insert(key, true);
        }
        table
    }
}

impl InterpolatingSolver for ReferenceSolver {
    fn new(max_var: u32) -> Self {
        ReferenceSolver {
            max_var,
            a_clauses: Vec::new(),
            b_clauses: Vec::new(),
            shared_clauses: Vec::new(),
            recorded: Vec::new(),
            interrupted: false,
        }
    }

    fn add_formula(&mut self, a: &Cnf, b: &Cnf) {
        self.max_var = self.max_var.max(a.num_vars).max(b.num_vars);
        self.a_clauses.extend(cnf_clauses(a));
        self.b_clauses.extend(cnf_clauses(b));
    }

    fn add_clause(&mut self, clause: &[Literal], label: ClauseLabel) {
        let raw: Vec<i32> = clause.iter().map(|l| l.0).collect();
        for &lit in &raw {
            self.max_var = self.max_var.max(lit.unsigned_abs());
        }
        match label {
            ClauseLabel::Shared => self.shared_clauses.push(raw),
            ClauseLabel::A => self.a_clauses.push(raw),
            ClauseLabel::B => self.b_clauses.push(raw),
        }
    }

    fn fresh_variable(&mut self) -> Alias {
        self.max_var += 1;
        Alias::from(self.max_var)
    }

    fn solve(&mut self) -> bool {
        self.find_model(&[]).is_some()
    }

    fn get_interpolant(
        &mut self,
        _output_var: Alias,
        assumptions: &[Alias],
        _shared_vars: &[Alias],
        conflict_limit: u32,
    ) -> bool {
        if self.interrupted {
            return false;
        }
        // Crude proxy for a conflict budget: refuse instances whose brute
        // force search would dwarf the requested limit.
        let search_space = 1u64.checked_shl(self.max_var).unwrap_or(u64::MAX);
        if search_space > (conflict_limit as u64).saturating_mul(64).max(4096) {
            return false;
        }
        let assumption_lits: Vec<i32> = assumptions.iter().map(|&a| a.get() as i32).collect();
        let unsat = self.find_model(&assumption_lits).is_none();
        if unsat {
            if let Some(&first) = assumption_lits.first() {
                self.recorded.push(Recorded { assumption: first });
            }
        }
        unsat
    }

    fn get_circuit(&mut self, shared_vars: &[Alias], use_all_interpolants: bool) -> Option<Aig> {
        if self.recorded.is_empty() {
            return None;
        }
        let entries: Vec<&Recorded> = if use_all_interpolants {
            self.recorded.iter().collect()
        } else {
            self.recorded.last().into_iter().collect()
        };

        let num_inputs = shared_vars.len() as u32;
        let mut nodes: Vec<AigNode> = Vec::new();
        let mut outputs = Vec::new();
        for entry in entries {
            let table = self.a_side_table(shared_vars, entry.assumption);
            let lit = build_from_table(&mut nodes, num_inputs, &table);
            outputs.push(lit);
        }
        Some(Aig { num_inputs, nodes, outputs })
    }

    fn interrupt(&mut self) {
        self.interrupted = true;
    }
}

fn mk_and(nodes: &mut Vec<AigNode>, num_inputs: u32, a: AigLit, b: AigLit) -> AigLit {
    if a.is_constant() {
        return if a.negated { AigLit::FALSE } else { b };
    }
    if b.is_constant() {
        return if b.negated { AigLit::FALSE } else { a };
    }
    nodes.push(AigNode { and0: a, and1: b });
    AigLit { node: num_inputs + nodes.len() as u32, negated: false }
}

fn mk_not(lit: AigLit) -> AigLit {
    AigLit { node: lit.node, negated: !lit.negated }
}

fn mk_or(nodes: &mut Vec<AigNode>, num_inputs: u32, a: AigLit, b: AigLit) -> AigLit {
    mk_not(mk_and(nodes, num_inputs, mk_not(a), mk_not(b)))
}

/// Shannon-expand `table` (keyed by full shared-variable assignments)
/// into an AIG over `num_inputs` primary inputs (one per shared
/// variable, in order).
fn build_from_table(nodes: &mut Vec<AigNode>, num_inputs: u32, table: &HashMap<Vec<bool>, bool>) -> AigLit {
    let var_lit = |idx: usize| -> AigLit { AigLit { node: idx as u32 + 1, negated: false } };

    let mut disjuncts: Vec<AigLit> = Vec::new();
    for (assignment, &value) in table {
        if !value {
            continue;
        }
        let mut term = AigLit::TRUE;
        for (i, &bit) in assignment.iter().enumerate().take(num_inputs as usize) {
            let v = var_lit(i);
            let lit = if bit { v } else { mk_not(v) };
            term = mk_and(nodes, num_inputs, term, lit);
        }
        disjuncts.push(term);
    }

    let mut acc = AigLit::FALSE;
    for d in disjuncts {
        acc = mk_or(nodes, num_inputs, acc, d);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(aig: &Aig, lit: AigLit, inputs: &[bool]) -> bool {
        fn go(aig: &Aig, lit: AigLit, inputs: &[bool]) -> bool {
            let v = if lit.is_constant() {
                true
            } else if aig.is_input(lit) {
                inputs[aig.input_index(lit) as usize]
            } else {
                let n = aig.nodes[(lit.node - aig.num_inputs - 1) as usize];
                go(aig, n.and0, inputs) && go(aig, n.and1, inputs)
            };
            v ^ lit.negated
        }
        go(aig, lit, inputs)
    }

    #[test]
    fn xor_definition_is_recovered() {
        // 3 := 1 xor 2, shared = {1, 2}, query variable = 3.
        let mut solver = ReferenceSolver::new(3);
        let clauses = [[-1, -2, 3], [1, 2, 3], [-1, 2, -3], [1, -2, -3]];
        for c in clauses {
            solver.add_clause(&c.map(Literal::from), ClauseLabel::A);
            let shifted: Vec<Literal> = c.iter().map(|&l| Literal::from(if l.abs() == 3 { l.signum() * 6 } else { l })).collect();
            solver.add_clause(&shifted, ClauseLabel::B);
        }
        let s_a = solver.fresh_variable();
        let s_b = solver.fresh_variable();
        solver.add_clause(&[Literal::from(-(s_a.get() as i32)), Literal::from(3)], ClauseLabel::A);
        solver.add_clause(&[Literal::from(-(s_b.get() as i32)), Literal::from(-6)], ClauseLabel::B);

        let unsat = solver.get_interpolant(Alias(3), &[s_a, s_b], &[Alias(1), Alias(2)], 1000);
        assert!(unsat, "3 should be shown unique given {{1,2}}");

        let aig = solver.get_circuit(&[Alias(1), Alias(2)], true).unwrap();
        assert_eq!(aig.outputs.len(), 1);
        for &v1 in &[false, true] {
            for &v2 in &[false, true] {
                let expected = v1 ^ v2;
                assert_eq!(eval(&aig, aig.outputs[0], &[v1, v2]), expected);
            }
        }
    }
}
