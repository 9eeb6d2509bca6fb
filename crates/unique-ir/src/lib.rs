//! Unique Gate-Graph Intermediate Representation
//!
//! This crate provides the core data structure shared by every format
//! `unique` understands: QCIR, DQCIR, QDIMACS and DQDIMACS all parse into
//! the same dense, alias-indexed [`GateGraph`]. It forms the foundation of
//! the whole `unique` pipeline — parsing, matrix construction, definition
//! extraction and emission all operate on this one representation.
//!
//! # Overview
//!
//! The gate graph is a `Vec`-backed arena indexed by [`Alias`]. Index `0`
//! is a reserved dummy slot, which lets [`Literal`] use a signed integer
//! to mean "this alias, negated" without a separate sign field. Aliases
//! in `[1, variable_gate_boundary)` are prefix variables in quantifier
//! order; the remainder are `And`/`Or` gates. Gate slots are never freed
//! once allocated — [`GateGraph::remove_redundant`] clears a gate's kind
//! and inputs but leaves its alias in place, so alias stability holds for
//! the lifetime of a graph.
//!
//! # Core Components
//!
//! - **Aliases and literals**: [`Alias`], [`Literal`] for addressing
//!   nodes and signed references to them
//! - **Gates**: [`Gate`], [`GateKind`] for prefix variables and AND/OR
//!   nodes
//! - **Dependencies**: [`DependencyMap`] for DQBF Herbrand dependency sets
//! - **Graph**: [`GateGraph`] the dense alias-indexed arena itself
//!
//! # Example: Building a Small Graph
//!
//! ```rust
//! use unique_ir::{GateGraph, GateKind, VariableType};
//!
//! let mut graph = GateGraph::new();
//! graph.begin_quantifier_block();
//! graph.add_variable("x", VariableType::Existential).unwrap();
//! graph.add_variable("y", VariableType::Existential).unwrap();
//! graph.add_gate("g1", GateKind::Or, &["x".to_string(), "-y".to_string()]).unwrap();
//! graph.set_output_id("g1");
//!
//! let order = graph.topological_order();
//! assert_eq!(order.len(), 1);
//! ```

pub mod alias;
pub mod dependency;
pub mod error;
pub mod gate;
pub mod graph;
pub mod kind;

pub use alias::{Alias, GateId, Literal};
pub use dependency::DependencyMap;
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use graph::GateGraph;
pub use kind::{GateKind, GatePolarity, VariableType};
