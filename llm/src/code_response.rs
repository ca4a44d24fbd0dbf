//! Turns a raw coder response into `GeneratedCode` (spec §4.3): exactly
//! three fenced code blocks, in order (extractor, models, tests).

use xgen_core::GeneratedCode;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CodeParsingError {
    #[error("expected exactly 3 fenced code blocks, found {found}")]
    WrongBlockCount { found: usize },

    #[error("a fenced block was empty after trimming")]
    EmptyBlock,
}

impl CodeParsingError {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Returns the contents of every fenced ```...``` block in appearance
/// order, with a leading language identifier line stripped.
fn fenced_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("```") {
        let after_open = start + 3;
        let Some(end_rel) = rest[after_open..].find("```") else { break };
        let inner = &rest[after_open..after_open + end_rel];
        let inner = match inner.find('\n') {
            Some(nl) if inner[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) && !inner[..nl].trim().is_empty() => {
                &inner[nl + 1..]
            }
            _ => inner,
        };
        blocks.push(inner.trim().to_string());
        rest = &rest[after_open + end_rel + 3..];
    }
    blocks
}

/// A markdown ATX heading (`#`...) or a short title-style line ending in
/// `:` — the two shapes coder responses tend to use to label sections
/// when they skip fenced blocks.
fn is_heading_line(line: &str) -> bool {
    let t = line.trim();
    if t.is_empty() {
        return false;
    }
    if t.starts_with('#') {
        return true;
    }
    t.ends_with(':') && t.len() < 60 && !t.contains('(') && !t.contains('{')
}

/// Splits `text` at its two most prominent section headings into three
/// segments (before heading 1, between heading 1 and 2, after heading
/// 2). Returns an empty vec when fewer than two headings are found.
fn split_at_two_headings(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let heading_idxs: Vec<usize> =
        lines.iter().enumerate().filter(|(_, l)| is_heading_line(l)).map(|(i, _)| i).collect();
    let [h1, h2] = match heading_idxs.as_slice() {
        [a, b, ..] => [*a, *b],
        _ => return Vec::new(),
    };
    vec![lines[..h1].join("\n"), lines[h1 + 1..h2].join("\n"), lines[h2 + 1..].join("\n")]
}

/// A segment's content is its first fenced block if it has one,
/// otherwise its own trimmed text.
fn segment_content(segment: &str) -> String {
    match fenced_blocks(segment).into_iter().next() {
        Some(block) => block,
        None => segment.trim().to_string(),
    }
}

pub fn parse_code_response(response: &str) -> Result<GeneratedCode, CodeParsingError> {
    let blocks = fenced_blocks(response);
    let fragments = if blocks.len() == 3 {
        blocks
    } else {
        let fragments: Vec<String> = split_at_two_headings(response)
            .iter()
            .map(|s| segment_content(s))
            .filter(|s| !s.is_empty())
            .collect();
        if fragments.len() < 3 {
            return Err(CodeParsingError::WrongBlockCount { found: blocks.len() });
        }
        fragments
    };
    if fragments.iter().any(|b| b.is_empty()) {
        return Err(CodeParsingError::EmptyBlock);
    }
    Ok(GeneratedCode {
        extractor_source: fragments[0].clone(),
        models_source: fragments[1].clone(),
        tests_source: fragments[2].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_fenced_blocks_in_order() {
        let response = "Here is the code.\n\
            ```python\nclass Extractor:\n    pass\n```\n\
            ```python\nclass Model:\n    pass\n```\n\
            ```python\ndef test_extractor():\n    pass\n```\n";
        let code = parse_code_response(response).unwrap();
        assert!(code.extractor_source.contains("class Extractor"));
        assert!(code.models_source.contains("class Model"));
        assert!(code.tests_source.contains("def test_extractor"));
    }

    #[test]
    fn wrong_block_count_is_an_error() {
        let response = "```python\nclass Extractor:\n    pass\n```\n";
        let err = parse_code_response(response).unwrap_err();
        assert!(matches!(err, CodeParsingError::WrongBlockCount { found: 1 }));
    }

    #[test]
    fn recovers_via_heading_split_when_fenced_blocks_are_missing() {
        let response = "class Extractor:\n    pass\n\
            ## Models\n\
            class Model:\n    pass\n\
            ## Tests\n\
            def test_extractor():\n    pass\n";
        let code = parse_code_response(response).unwrap();
        assert!(code.extractor_source.contains("class Extractor"));
        assert!(code.models_source.contains("class Model"));
        assert!(code.tests_source.contains("def test_extractor"));
    }

    #[test]
    fn heading_split_still_errors_when_fewer_than_three_fragments_result() {
        let response = "## Models\nclass Model:\n    pass\n";
        let err = parse_code_response(response).unwrap_err();
        assert!(matches!(err, CodeParsingError::WrongBlockCount { found: 0 }));
    }
}
