//! A single gate-graph node.

use crate::alias::{GateId, Literal};
use crate::kind::GateKind;

/// A node in the [`crate::GateGraph`]: either a prefix variable or an
/// AND/OR gate.
///
/// Invariant: `inputs` is non-empty iff `kind` is `And` or `Or` at the
/// time a CNF/emission operation runs. Variables never carry inputs.
#[derive(Debug, Clone)]
pub struct Gate {
    /// Textual identifier carried from input (empty for unresolved
    /// placeholders or synthesized auxiliaries awaiting an id).
    pub id: GateId,
    /// Kind of this node.
    pub kind: GateKind,
    /// 1-based quantifier-block depth for variable gates (0 for gates).
    pub depth: u32,
    /// Ordered, signed inputs (empty for variables).
    pub inputs: Vec<Literal>,
}

impl Gate {
    /// An unresolved placeholder awaiting a definition (forward reference).
    pub fn placeholder(id: GateId) -> Self {
        Gate {
            id,
            kind: GateKind::None,
            depth: 0,
            inputs: Vec::new(),
        }
    }

    #[inline]
    pub fn is_and_or(&self) -> bool {
        self.kind.is_gate()
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        self.kind.is_variable()
    }
}
