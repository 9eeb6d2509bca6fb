//! Error types for the QCIR/QDIMACS/DQCIR/DQDIMACS front ends.

use thiserror::Error;

/// Errors that can occur while reading or writing one of the four
/// supported formats.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Underlying I/O failure (opening the input, ordering, or output file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `checkFileType`-equivalent detection found neither a `#QCIR`
    /// header nor a parseable DIMACS preamble.
    #[error("unrecognized input file: {0}")]
    UnrecognizedFileType(String),

    /// A line didn't match the grammar expected at that point (e.g. a
    /// `d`-line with no dependent variable, a gate line missing `=`).
    #[error("malformed line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    /// A `p cnf <vars> <clauses>` header was missing or malformed.
    #[error("malformed DIMACS header: {0}")]
    MalformedHeader(String),

    /// Gate-graph construction failed (duplicate id, bad alias, ...).
    #[error(transparent)]
    Ir(#[from] unique_ir::IrError),
}

/// Result type for parsing/emission operations.
pub type ParseResult<T> = Result<T, ParseError>;
