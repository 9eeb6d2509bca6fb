//! Error types for the IR crate.

use thiserror::Error;

use crate::alias::{Alias, GateId};

/// Errors that can occur in gate-graph operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate id was defined twice.
    #[error("gate '{0}' already defined")]
    DuplicateGateId(GateId),

    /// A literal referenced an alias outside `[1, N)`.
    #[error("literal references out-of-range alias {0}")]
    AliasOutOfRange(Alias),

    /// `remove_redundant`/`splice_definition` were asked to overwrite a
    /// gate that already carries inputs.
    #[error("gate {0} already has inputs, refusing to overwrite")]
    GateAlreadyDefined(Alias),

    /// The output alias was never set.
    #[error("no output gate has been designated")]
    MissingOutput,

    /// A definition clause referenced an alias not produced by the AIG walk.
    #[error("definition splice references unknown input alias {0}")]
    UnknownDefinitionInput(Alias),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
