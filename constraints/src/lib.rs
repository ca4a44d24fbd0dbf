//! `xgen-constraints`: the constraint engine (C4) — tree-sitter backed
//! Python AST validation against a closed set of seven walkers.

pub mod ast_util;
pub mod engine;
pub mod parser;
pub mod walkers;

pub use engine::ConstraintEngine;
pub use parser::{parse_source, SourceParseError};
