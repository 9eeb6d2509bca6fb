//! Error types for the extraction engine.

use thiserror::Error;

/// Errors that can occur while building the matrix or extracting
/// definitions. Parser- and emitter-level errors live in their own
/// crate; this enum covers only the solve pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The gate graph has no designated output gate.
    #[error("gate graph has no output alias")]
    MissingOutput,

    /// The matrix builder was asked to encode a gate whose `kind` is not
    /// `And`/`Or` (a variable or a deleted gate slipped into the walk).
    #[error("cannot encode gate {0} of non-gate kind into CNF")]
    NotAGate(unique_ir::Alias),

    /// The solver reported it could not allocate the requested number of
    /// variables (out of memory during `new`).
    #[error("solver failed to allocate {0} variables")]
    SolverAllocation(u32),

    /// Propagated from [`unique_ir::IrError`] when splicing definitions
    /// back into the graph.
    #[error(transparent)]
    Ir(#[from] unique_ir::IrError),
}

/// Result type for the solve crate.
pub type CompileResult<T> = Result<T, CompileError>;
