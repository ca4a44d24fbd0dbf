//! Tree-sitter substrate: parses Python-shaped source into an AST,
//! grounded on the teacher's `LanguageParser` (core/src/language_parsing.rs)
//! but narrowed to the single grammar this engine needs.

use tree_sitter::{Parser, Tree};

#[derive(Debug, thiserror::Error)]
pub enum SourceParseError {
    #[error("failed to initialize the Python grammar: {0}")]
    LanguageInit(String),

    #[error("tree-sitter failed to produce a parse tree")]
    EmptyTree,
}

/// Parse `source` as Python. A `Tree` is returned even for source with
/// syntax errors — tree-sitter is error-tolerant; callers that need a
/// hard failure should inspect `tree.root_node().has_error()`.
pub fn parse_source(source: &str) -> Result<Tree, SourceParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(tree_sitter_python::language())
        .map_err(|e| SourceParseError::LanguageInit(e.to_string()))?;
    parser.parse(source, None).ok_or(SourceParseError::EmptyTree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_function() {
        let tree = parse_source("def f(x: int) -> int:\n    return x\n").unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn flags_syntax_errors() {
        let tree = parse_source("def f(:\n").unwrap();
        assert!(tree.root_node().has_error());
    }
}
