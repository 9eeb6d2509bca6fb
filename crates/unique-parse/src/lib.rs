//! Readers and writers for the four formats `unique` understands: QCIR,
//! DQCIR, QDIMACS, and DQDIMACS.
//!
//! Each format module (`qcir`, `dqcir`, `qdimacs`, `dqdimacs`) owns its
//! own line grammar but funnels construction through the shared
//! [`builder::GateGraphBuilder`] — a composition-based replacement for
//! the original's parser inheritance hierarchy. [`detect`] sniffs a
//! format from its content; [`emit`] writes a gate graph back out in
//! any of the four output formats the CLI exposes; [`ordering`] reads
//! the optional variable-priority file consumed by `unique-solve`'s
//! query selector.

pub mod builder;
pub mod detect;
pub mod dqcir;
pub mod dqdimacs;
pub mod emit;
pub mod error;
pub mod ordering;
pub mod qcir;
pub mod qdimacs;

pub use detect::FileType;
pub use error::{ParseError, ParseResult};

use std::io::BufRead;

use unique_ir::{DependencyMap, GateGraph};

/// Parse `reader` according to `format`, dispatching to the matching
/// module.
pub fn parse<R: BufRead>(format: FileType, reader: R) -> ParseResult<(GateGraph, DependencyMap)> {
    match format {
        FileType::Qcir => qcir::parse(reader),
        FileType::Dqcir => dqcir::parse(reader),
        FileType::Qdimacs => qdimacs::parse(reader),
        FileType::Dqdimacs => dqdimacs::parse(reader),
    }
}
