//! Shared AST helpers used by every walker: recursive node collection
//! and small text-based heuristics, in the teacher's hybrid style of
//! matching on `node.kind()` plus source-text substring checks
//! (`python_analyzer.rs::analyze_python_issues`).

use tree_sitter::Node;

pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

pub fn line(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}

pub fn column(node: Node) -> u32 {
    node.start_position().column as u32
}

pub fn line_text(source: &str, row: usize) -> &str {
    source.lines().nth(row).unwrap_or("")
}

/// Collect every descendant node (including `root`) whose kind is in `kinds`.
pub fn collect_by_kind<'a>(root: Node<'a>, kinds: &[&str]) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if kinds.contains(&node.kind()) {
            out.push(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push(child);
        }
    }
    out
}

/// True if `node` (a `function_definition`) is declared `async`. Checked
/// against the source line rather than an AST field, matching the
/// teacher's preference for text checks over grammar-field plumbing.
pub fn is_async_function(node: Node, source: &str) -> bool {
    let row = node.start_position().row;
    line_text(source, row).trim_start().starts_with("async def")
}

/// The function/class name, via the grammar's `name` field.
pub fn definition_name<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    node.child_by_field_name("name").map(|n| node_text(n, source))
}

/// True if `name` looks public by Python convention (no leading underscore).
pub fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}

/// Decorator names (without the leading `@`) attached to a
/// `decorated_definition` node.
pub fn decorator_names<'a>(decorated: Node<'a>, source: &'a str) -> Vec<&'a str> {
    let mut names = Vec::new();
    let mut cursor = decorated.walk();
    for child in decorated.children(&mut cursor) {
        if child.kind() == "decorator" {
            let text = node_text(child, source).trim_start_matches('@').trim();
            // Strip a call's argument list, e.g. "inject(scope=...)".
            let name = text.split('(').next().unwrap_or(text).trim();
            names.push(name);
        }
    }
    names
}

/// Find the immediate `function_definition`/`class_definition` payload
/// of a `decorated_definition` node.
pub fn decorated_payload<'a>(decorated: Node<'a>) -> Option<Node<'a>> {
    let mut cursor = decorated.walk();
    decorated
        .children(&mut cursor)
        .find(|c| c.kind() == "function_definition" || c.kind() == "class_definition")
}
