//! Shared parsing strategy behind all four front ends.
//!
//! Rather than the original's multiple inheritance (a `DQCIRParser`
//! extending both a QCIR and a DQDIMACS parser), every concrete parser
//! owns one [`GateGraphBuilder`] and calls its line handlers directly.
//! There is no parser trait to implement — a format module is just a
//! loop over lines dispatching to whichever handlers its grammar uses.

use unique_ir::{Alias, DependencyMap, GateGraph, GateKind, GateId, Literal, VariableType};

use crate::error::{ParseError, ParseResult};

/// Accumulates one gate graph (plus, for DQBF inputs, a dependency map)
/// across a sequence of line-handler calls.
#[derive(Debug, Default)]
pub struct GateGraphBuilder {
    pub graph: GateGraph,
    pub deps: DependencyMap,
}

impl GateGraphBuilder {
    pub fn new() -> Self {
        GateGraphBuilder {
            graph: GateGraph::new(),
            deps: DependencyMap::new(),
        }
    }

    /// `exists(...)` / `forall(...)` or `e ... 0` / `a ... 0`: one new
    /// quantifier block containing `ids`, all of kind `kind`.
    pub fn quantifier_block(&mut self, kind: VariableType, ids: &[String], line: usize) -> ParseResult<()> {
        self.graph.begin_quantifier_block();
        for id in ids {
            self.graph.add_variable(id, kind).map_err(|e| ParseError::MalformedLine {
                line,
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// `g = and(...)` / `g = or(...)`.
    pub fn gate(&mut self, id: &str, kind: GateKind, inputs: &[String], line: usize) -> ParseResult<Alias> {
        self.graph.add_gate(id, kind, inputs).map_err(|e| ParseError::MalformedLine {
            line,
            message: e.to_string(),
        })
    }

    /// A QDIMACS/DQDIMACS clause line (trailing `0` already stripped):
    /// becomes an `Or` gate with a fresh numeric id.
    pub fn clause(&mut self, literals: &[String], line: usize) -> ParseResult<Alias> {
        let id = (self.graph.max_id_number() + 1).to_string();
        self.graph.add_gate(&id, GateKind::Or, literals).map_err(|e| ParseError::MalformedLine {
            line,
            message: e.to_string(),
        })
    }

    /// QCIR/DQCIR `output(id)`.
    pub fn output(&mut self, id: &str) {
        self.graph.set_output_id(id);
    }

    /// Synthesize the DIMACS-family output gate: an AND over every
    /// clause `Or` gate introduced so far (aliases in
    /// `[variable_gate_boundary, len)`), with a fresh numeric id.
    pub fn finish_clauses(&mut self) {
        let start = usize::from(self.graph.variable_gate_boundary());
        let end = self.graph.len();
        let inputs: Vec<Literal> = (start..end).map(|i| Literal::new(Alias::from(i), false)).collect();
        let id: GateId = self.graph.fresh_id();
        let alias = self
            .graph
            .add_gate_literal(id, GateKind::And, inputs)
            .expect("synthetic output gate id is always fresh");
        self.graph.set_output(alias);
    }

    /// `d <var> <dep1> ... <depk> 0`: `var` is created as `Existential`
    /// if not already a variable (the DQDIMACS case — DQCIR always
    /// quantifies it explicitly beforehand already).
    pub fn dependency(&mut self, variable_id: &str, dependency_ids: &[String], line: usize) -> ParseResult<()> {
        if self.graph.alias_of(variable_id).is_none() {
            self.graph
                .add_variable(variable_id, VariableType::Existential)
                .map_err(|e| ParseError::MalformedLine {
                    line,
                    message: e.to_string(),
                })?;
        }
        let variable = self.graph.alias_of(variable_id).expect("just inserted");
        let mut depset = Vec::with_capacity(dependency_ids.len());
        for dep_id in dependency_ids {
            let alias = self.graph.alias_of(dep_id).ok_or_else(|| ParseError::MalformedLine {
                line,
                message: format!("dependency '{dep_id}' referenced before being quantified"),
            })?;
            depset.push(alias);
        }
        self.deps.insert(variable, depset);
        Ok(())
    }

    /// Run once parsing is complete: garbage-collect gates unreachable
    /// from the output.
    pub fn finish(mut self) -> ParseResult<(GateGraph, DependencyMap)> {
        if self.graph.output_alias().is_none() {
            return Err(ParseError::MalformedHeader("no output gate was ever set".to_string()));
        }
        self.graph.remove_redundant();
        Ok((self.graph, self.deps))
    }
}
