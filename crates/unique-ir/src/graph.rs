//! Gate-graph: the central intermediate representation.
//!
//! The graph is a dense, alias-indexed arena unifying QCIR, QDIMACS,
//! DQCIR and DQDIMACS under one data model. Index `0` is a dummy slot so
//! that literals can be signed (negative literals encode negation).
//! Aliases in `[1, variable_gate_boundary)` are prefix variables, in
//! quantifier-prefix order; aliases in `[variable_gate_boundary, N)` are
//! AND/OR gates. Gates may be appended both while parsing and later,
//! when extracted definitions are spliced back in ([`GateGraph::splice_definition`]).
//!
//! # Performance
//!
//! `remove_redundant` and `polarities` both run a single reference-count
//! worklist pass (`O(V+E)`), avoiding the repeated edge scans a naive
//! mark-and-sweep would need.

use rustc_hash::FxHashMap;

use crate::alias::{Alias, GateId, Literal};
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::kind::{GateKind, GatePolarity, VariableType};

/// Dense, alias-indexed gate DAG. See the module documentation for the
/// layout invariants.
#[derive(Debug)]
pub struct GateGraph {
    gates: Vec<Gate>,
    id_to_alias: FxHashMap<GateId, Alias>,
    variable_gate_boundary: Alias,
    output_alias: Option<Alias>,
    current_depth: u32,
    max_quantifier_depth: u32,
    number_existential: u32,
    number_universal: u32,
    max_id_number: u64,
    defined_ids: Vec<GateId>,
    definition_aliases: Vec<Alias>,
}

impl Default for GateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GateGraph {
    /// Create an empty graph with only the dummy slot `0` present.
    pub fn new() -> Self {
        GateGraph {
            gates: vec![Gate::placeholder(String::new())],
            id_to_alias: FxHashMap::default(),
            variable_gate_boundary: Alias(1),
            output_alias: None,
            current_depth: 0,
            max_quantifier_depth: 0,
            number_existential: 0,
            number_universal: 0,
            max_id_number: 0,
            defined_ids: Vec::new(),
            definition_aliases: Vec::new(),
        }
    }

    // ---- construction (parser-facing) ----------------------------------

    /// Open a new quantifier block, bumping the depth used by subsequent
    /// [`GateGraph::add_variable`] calls.
    pub fn begin_quantifier_block(&mut self) -> u32 {
        self.current_depth += 1;
        self.max_quantifier_depth = self.max_quantifier_depth.max(self.current_depth);
        self.current_depth
    }

    /// Resolve `id` to its alias, creating an unresolved placeholder gate
    /// if it hasn't been seen before (a forward reference).
    pub fn get_or_create_alias(&mut self, id: &str) -> Alias {
        if let Some(&alias) = self.id_to_alias.get(id) {
            return alias;
        }
        let alias = Alias::from(self.gates.len());
        self.gates.push(Gate::placeholder(id.to_string()));
        self.id_to_alias.insert(id.to_string(), alias);
        alias
    }

    /// Resolve a signed textual token (`"-3"`, `"g7"`, ...) to a signed
    /// [`Literal`], creating a placeholder for the underlying id if needed.
    pub fn resolve_literal(&mut self, token: &str) -> Literal {
        let (negated, rest) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let alias = self.get_or_create_alias(rest);
        Literal::new(alias, negated)
    }

    /// Append a prefix variable at the next alias. Fails if `id` already
    /// names a variable or gate (a plain forward-reference placeholder
    /// may still be promoted).
    pub fn add_variable(&mut self, id: &str, kind: VariableType) -> IrResult<Alias> {
        if let Ok(n) = id.parse::<u64>() {
            self.max_id_number = self.max_id_number.max(n);
        }
        let alias = self.get_or_create_alias(id);
        let gate = &mut self.gates[usize::from(alias)];
        if gate.kind != GateKind::None {
            return Err(IrError::DuplicateGateId(id.to_string()));
        }
        gate.kind = kind.gate_kind();
        gate.depth = self.current_depth;
        match kind {
            VariableType::Existential => self.number_existential += 1,
            VariableType::Universal => self.number_universal += 1,
        }
        self.variable_gate_boundary = Alias::from(usize::from(self.variable_gate_boundary) + 1);
        Ok(alias)
    }

    /// Define an AND/OR gate from signed textual input tokens. Pre:
    /// gate `id` not previously defined.
    pub fn add_gate(&mut self, id: &str, kind: GateKind, input_tokens: &[String]) -> IrResult<Alias> {
        debug_assert!(matches!(kind, GateKind::And | GateKind::Or));
        if let Ok(n) = id.parse::<u64>() {
            self.max_id_number = self.max_id_number.max(n);
        }
        let alias = self.get_or_create_alias(id);
        {
            let gate = &self.gates[usize::from(alias)];
            if gate.kind != GateKind::None {
                return Err(IrError::GateAlreadyDefined(alias));
            }
        }
        let mut inputs = Vec::with_capacity(input_tokens.len());
        for token in input_tokens {
            inputs.push(self.resolve_literal(token));
        }
        let gate = &mut self.gates[usize::from(alias)];
        gate.kind = kind;
        gate.inputs = inputs;
        Ok(alias)
    }

    /// Append an AND/OR gate whose inputs are already-resolved literals
    /// (used by QDIMACS clause ingestion and by definition splicing).
    pub fn add_gate_literal(&mut self, id: GateId, kind: GateKind, inputs: Vec<Literal>) -> IrResult<Alias> {
        debug_assert!(matches!(kind, GateKind::And | GateKind::Or));
        if let Ok(n) = id.parse::<u64>() {
            self.max_id_number = self.max_id_number.max(n);
        }
        let alias = self.get_or_create_alias(&id);
        {
            let gate = &self.gates[usize::from(alias)];
            if gate.kind != GateKind::None {
                return Err(IrError::GateAlreadyDefined(alias));
            }
        }
        let gate = &mut self.gates[usize::from(alias)];
        gate.kind = kind;
        gate.inputs = inputs;
        Ok(alias)
    }

    pub fn set_output(&mut self, alias: Alias) {
        self.output_alias = Some(alias);
    }

    pub fn set_output_id(&mut self, id: &str) -> Alias {
        let alias = self.get_or_create_alias(id);
        self.output_alias = Some(alias);
        alias
    }

    /// Allocate a fresh numeric id, e.g. for a synthesized output gate
    /// or a spliced-in definition that had none.
    pub fn fresh_id(&mut self) -> GateId {
        self.max_id_number += 1;
        self.max_id_number.to_string()
    }

    // ---- accessors -------------------------------------------------------

    #[inline]
    pub fn gate(&self, alias: Alias) -> &Gate {
        &self.gates[usize::from(alias)]
    }

    #[inline]
    pub fn gate_mut(&mut self, alias: Alias) -> &mut Gate {
        &mut self.gates[usize::from(alias)]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.len() <= 1
    }

    /// Largest valid alias (`gates.len() - 1`); also the natural cutoff
    /// `N - 1` referenced in the data-model invariants.
    #[inline]
    pub fn max_alias(&self) -> u32 {
        self.gates.len() as u32 - 1
    }

    #[inline]
    pub fn max_id_number(&self) -> u64 {
        self.max_id_number
    }

    #[inline]
    pub fn variable_gate_boundary(&self) -> Alias {
        self.variable_gate_boundary
    }

    #[inline]
    pub fn max_quantifier_depth(&self) -> u32 {
        self.max_quantifier_depth
    }

    #[inline]
    pub fn number_variables(&self, kind: VariableType) -> u32 {
        match kind {
            VariableType::Existential => self.number_existential,
            VariableType::Universal => self.number_universal,
        }
    }

    #[inline]
    pub fn output_alias(&self) -> Option<Alias> {
        self.output_alias
    }

    #[inline]
    pub fn alias_of(&self, id: &str) -> Option<Alias> {
        self.id_to_alias.get(id).copied()
    }

    #[inline]
    pub fn defined_ids(&self) -> &[GateId] {
        &self.defined_ids
    }

    #[inline]
    pub fn definition_aliases(&self) -> &[Alias] {
        &self.definition_aliases
    }

    /// Iterate over prefix variables `[1, variable_gate_boundary)` in
    /// quantifier order.
    pub fn variables(&self) -> impl Iterator<Item = Alias> + '_ {
        (1..usize::from(self.variable_gate_boundary)).map(Alias::from)
    }

    /// Iterate over all aliases, including gates, starting at 1.
    pub fn all_aliases(&self) -> impl Iterator<Item = Alias> + '_ {
        (1..self.gates.len()).map(Alias::from)
    }

    // ---- redundant-gate elimination --------------------------------------

    /// Garbage-collect gates unreachable from the output, via a
    /// reference-counted worklist. Never frees variable slots. Returns
    /// the number of gates removed.
    pub fn remove_redundant(&mut self) -> usize {
        let output = match self.output_alias {
            Some(o) => o,
            None => return 0,
        };
        let n = self.gates.len();
        let mut refcount = vec![0u32; n];
        for alias in usize::from(self.variable_gate_boundary)..n {
            let gate = &self.gates[alias];
            if gate.is_and_or() {
                for lit in &gate.inputs {
                    refcount[usize::from(lit.alias())] += 1;
                }
            }
        }

        let mut queue: Vec<Alias> = Vec::new();
        for alias_idx in usize::from(self.variable_gate_boundary)..n {
            let alias = Alias::from(alias_idx);
            let gate = &self.gates[alias_idx];
            if alias != output && refcount[alias_idx] == 0 && gate.is_and_or() {
                queue.push(alias);
            }
        }

        let mut removed = 0usize;
        while let Some(alias) = queue.pop() {
            let inputs = std::mem::take(&mut self.gates[usize::from(alias)].inputs);
            self.gates[usize::from(alias)].kind = GateKind::None;
            removed += 1;
            for lit in &inputs {
                let input_alias = lit.alias();
                let idx = usize::from(input_alias);
                refcount[idx] = refcount[idx].saturating_sub(1);
                if refcount[idx] == 0 && self.gates[idx].is_and_or() {
                    queue.push(input_alias);
                }
            }
        }
        removed
    }

    // ---- topological order -------------------------------------------------

    /// Reverse post-order from the output over `And`/`Or` gates only;
    /// ties broken by decrement order (the order in which a gate's last
    /// remaining reference disappears). Used verbatim by emitters.
    pub fn topological_order(&self) -> Vec<Alias> {
        let output = match self.output_alias {
            Some(o) => o,
            None => return Vec::new(),
        };
        let n = self.gates.len();
        let mut remaining_outputs = vec![0u32; n];
        for alias in 1..n {
            let gate = &self.gates[alias];
            if gate.is_and_or() {
                for lit in &gate.inputs {
                    remaining_outputs[usize::from(lit.alias())] += 1;
                }
            }
        }

        let mut ordered = Vec::new();
        let mut queue = vec![output];
        while let Some(alias) = queue.pop() {
            ordered.push(alias);
            let gate = &self.gates[usize::from(alias)];
            for lit in &gate.inputs {
                let input_alias = lit.alias();
                let idx = usize::from(input_alias);
                remaining_outputs[idx] = remaining_outputs[idx].saturating_sub(1);
                if remaining_outputs[idx] == 0 && self.gates[idx].is_and_or() {
                    queue.push(input_alias);
                }
            }
        }
        ordered.reverse();
        ordered
    }

    // ---- polarity propagation ----------------------------------------------

    /// Propagate Tseitin polarity from the output down to every gate,
    /// joining across multiple uses. Each gate is processed once its
    /// out-degree (within the surviving AND/OR subgraph) drops to zero.
    pub fn polarities(&self, output_polarity: GatePolarity) -> Vec<GatePolarity> {
        let n = self.gates.len();
        let mut remaining_outputs = vec![0u32; n];
        for alias in 1..n {
            let gate = &self.gates[alias];
            if gate.is_and_or() {
                for lit in &gate.inputs {
                    remaining_outputs[usize::from(lit.alias())] += 1;
                }
            }
        }

        let mut polarity = vec![GatePolarity::None; n];
        let output = match self.output_alias {
            Some(o) => o,
            None => return polarity,
        };
        polarity[usize::from(output)] = output_polarity;
        let mut queue = vec![output];
        while let Some(alias) = queue.pop() {
            let gate = &self.gates[usize::from(alias)];
            let parent_polarity = polarity[usize::from(alias)];
            for lit in &gate.inputs {
                let input_alias = lit.alias();
                let idx = usize::from(input_alias);
                let child_polarity = if lit.is_negated() { -parent_polarity } else { parent_polarity };
                polarity[idx] = polarity[idx].join(child_polarity);
                remaining_outputs[idx] = remaining_outputs[idx].saturating_sub(1);
                if remaining_outputs[idx] == 0 && self.gates[idx].is_and_or() {
                    queue.push(input_alias);
                }
            }
        }
        polarity
    }

    // ---- definition splicing ------------------------------------------------

    /// Splice an extracted definition `(inputs, out_alias)` back into
    /// the graph as an AND gate. `out_alias` may exceed the current
    /// length, in which case the graph grows with `None`-kind
    /// placeholders up to and including it.
    ///
    /// Pre: the gate at `out_alias` has no pre-existing inputs — callers
    /// never overwrite an existing definition.
    pub fn splice_definition(&mut self, inputs: Vec<Literal>, out_alias: Alias) -> IrResult<()> {
        let idx = usize::from(out_alias);
        if idx >= self.gates.len() {
            self.gates.resize_with(idx + 1, || Gate::placeholder(String::new()));
        }
        {
            let gate = &self.gates[idx];
            if !gate.inputs.is_empty() {
                return Err(IrError::GateAlreadyDefined(out_alias));
            }
        }
        let gate = &mut self.gates[idx];
        gate.kind = GateKind::And;
        gate.inputs = inputs;
        if gate.id.is_empty() {
            let fresh = self.max_id_number.wrapping_add(1);
            self.max_id_number = fresh;
            gate.id = fresh.to_string();
            self.id_to_alias.insert(gate.id.clone(), out_alias);
        }
        self.definition_aliases.push(out_alias);
        Ok(())
    }

    /// Record that `alias` received a definition (for provenance in
    /// `defined variables:` emission comments).
    pub fn mark_defined(&mut self, alias: Alias) {
        self.defined_ids.push(self.gates[usize::from(alias)].id.clone());
    }
}
