//! Pattern detection: for each output field, try the closed set of
//! pattern variants against the input fields, in the priority order
//! the spec lists them (§4.1), keeping the first variant whose best
//! candidate clears the confidence floor.

use crate::schema_infer::classify_leaf;
use regex::Regex;
use xgen_core::{DocValue, Example, Kind, Pattern, PatternKind, PatternPolicy, Schema, SubstringRule};

fn field_values<'a>(examples: &'a [Example], side: Side, name: &str) -> Vec<Option<&'a DocValue>> {
    examples
        .iter()
        .map(|ex| {
            let doc = match side {
                Side::Input => &ex.input,
                Side::Output => &ex.output,
            };
            doc.as_object().and_then(|m| m.get(name))
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Side {
    Input,
    Output,
}

fn as_text(v: &DocValue) -> Option<String> {
    match v {
        DocValue::String(s) => Some(s.clone()),
        DocValue::Number(n) => Some(n.to_string()),
        DocValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Detect every pattern linking `input_schema` to `output_schema` over
/// the given examples. Returns at most one pattern per output field.
pub fn detect_patterns(
    examples: &[Example],
    input_schema: &Schema,
    output_schema: &Schema,
    policy: &PatternPolicy,
) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for out_field in &output_schema.fields {
        if let Some(p) = detect_for_field(examples, input_schema, out_field.name.as_str(), out_field.kind, policy) {
            if p.confidence >= policy.min_confidence {
                patterns.push(p);
            }
        }
    }
    patterns
}

fn detect_for_field(
    examples: &[Example],
    input_schema: &Schema,
    out_name: &str,
    out_kind: Kind,
    policy: &PatternPolicy,
) -> Option<Pattern> {
    if let Some(p) = try_passthrough(examples, input_schema, out_name, out_kind) {
        return Some(p);
    }
    if let Some(p) = try_field_rename(examples, input_schema, out_name, out_kind) {
        return Some(p);
    }
    if let Some(p) = try_type_convert(examples, input_schema, out_name, out_kind) {
        return Some(p);
    }
    if let Some(p) = try_concatenate(examples, input_schema, out_name, policy) {
        return Some(p);
    }
    if let Some(p) = try_substring(examples, input_schema, out_name) {
        return Some(p);
    }
    try_value_map(examples, input_schema, out_name, policy)
}

fn confidence_of<F>(examples: &[Example], out_name: &str, mut predicate: F) -> f64
where
    F: FnMut(&Example) -> bool,
{
    if examples.is_empty() {
        return 0.0;
    }
    let matches = examples.iter().filter(|ex| {
        let has_output = ex
            .output
            .as_object()
            .map(|m| m.contains_key(out_name))
            .unwrap_or(false);
        has_output && predicate(ex)
    }).count();
    matches as f64 / examples.len() as f64
}

fn try_passthrough(examples: &[Example], input_schema: &Schema, out_name: &str, out_kind: Kind) -> Option<Pattern> {
    let in_field = input_schema.field(out_name)?;
    if in_field.kind != out_kind {
        return None;
    }
    let conf = confidence_of(examples, out_name, |ex| {
        let in_v = ex.input.as_object().and_then(|m| m.get(out_name));
        let out_v = ex.output.as_object().and_then(|m| m.get(out_name));
        in_v == out_v
    });
    if conf >= 0.999 {
        Some(Pattern::new(PatternKind::Passthrough { field: out_name.to_string() }, 1.0))
    } else {
        None
    }
}

fn try_field_rename(examples: &[Example], input_schema: &Schema, out_name: &str, out_kind: Kind) -> Option<Pattern> {
    let mut best: Option<Pattern> = None;
    for in_field in &input_schema.fields {
        if in_field.name == out_name || in_field.kind != out_kind {
            continue;
        }
        let conf = confidence_of(examples, out_name, |ex| {
            let in_v = ex.input.as_object().and_then(|m| m.get(&in_field.name));
            let out_v = ex.output.as_object().and_then(|m| m.get(out_name));
            in_v == out_v
        });
        if conf > best.as_ref().map(|p| p.confidence).unwrap_or(0.0) {
            best = Some(Pattern::new(
                PatternKind::FieldRename { from: in_field.name.clone(), to: out_name.to_string() },
                conf,
            ));
        }
    }
    best
}

fn try_type_convert(examples: &[Example], input_schema: &Schema, out_name: &str, out_kind: Kind) -> Option<Pattern> {
    let in_field = input_schema.field(out_name)?;
    if in_field.kind == out_kind {
        return None;
    }
    let explicable = matches!(
        (in_field.kind, out_kind),
        (Kind::Integer, Kind::Float)
            | (Kind::Boolean, Kind::Integer)
            | (Kind::String, Kind::Integer)
            | (Kind::String, Kind::Float)
            | (Kind::String, Kind::Date)
            | (Kind::String, Kind::Datetime)
            | (Kind::String, Kind::Boolean)
    );
    if !explicable {
        return None;
    }
    let conf = confidence_of(examples, out_name, |ex| {
        let in_v = ex.input.as_object().and_then(|m| m.get(out_name));
        let out_v = ex.output.as_object().and_then(|m| m.get(out_name));
        match (in_v, out_v) {
            (Some(iv), Some(ov)) => classify_leaf(iv) == in_field.kind && classify_leaf(ov) == out_kind,
            _ => false,
        }
    });
    Some(Pattern::new(
        PatternKind::TypeConvert { field: out_name.to_string(), from_kind: in_field.kind, to_kind: out_kind },
        conf,
    ))
}

fn try_concatenate(examples: &[Example], input_schema: &Schema, out_name: &str, policy: &PatternPolicy) -> Option<Pattern> {
    let string_fields: Vec<&str> = input_schema
        .fields
        .iter()
        .filter(|f| f.kind == Kind::String)
        .map(|f| f.name.as_str())
        .collect();

    let mut best: Option<Pattern> = None;
    for separator in &policy.concat_separators {
        for combo in combinations(&string_fields, 2).into_iter().chain(combinations(&string_fields, 3)) {
            let conf = confidence_of(examples, out_name, |ex| {
                let parts: Option<Vec<String>> = combo
                    .iter()
                    .map(|f| ex.input.as_object().and_then(|m| m.get(*f)).and_then(as_text))
                    .collect();
                let Some(parts) = parts else { return false };
                let expected = parts.join(separator);
                ex.output
                    .as_object()
                    .and_then(|m| m.get(out_name))
                    .and_then(as_text)
                    .map(|s| s == expected)
                    .unwrap_or(false)
            });
            if conf >= 0.999 && best.is_none() {
                best = Some(Pattern::new(
                    PatternKind::Concatenate {
                        sources: combo.iter().map(|s| s.to_string()).collect(),
                        separator: separator.clone(),
                        into: out_name.to_string(),
                    },
                    conf,
                ));
            }
        }
        if best.is_some() {
            break;
        }
    }
    best
}

fn combinations<'a>(items: &[&'a str], k: usize) -> Vec<Vec<&'a str>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    if k == items.len() {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    fn go<'a>(items: &[&'a str], k: usize, start: usize, cur: &mut Vec<&'a str>, out: &mut Vec<Vec<&'a str>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..items.len() {
            cur.push(items[i]);
            go(items, k, i + 1, cur, out);
            cur.pop();
        }
    }
    go(items, k, 0, &mut Vec::new(), &mut result);
    result
}

fn try_substring(examples: &[Example], input_schema: &Schema, out_name: &str) -> Option<Pattern> {
    let string_fields: Vec<&str> = input_schema
        .fields
        .iter()
        .filter(|f| f.kind == Kind::String)
        .map(|f| f.name.as_str())
        .collect();

    for source in &string_fields {
        // Try a fixed slice consistent across every example.
        if let Some(pattern) = try_slice(examples, source, out_name) {
            return Some(pattern);
        }
        // Try a first-regex-match: extract the run of digits, a common
        // extraction need (e.g. pulling a numeric id out of a code).
        let digits = Regex::new(r"\d+").unwrap();
        let conf = confidence_of(examples, out_name, |ex| {
            let Some(input_val) = ex.input.as_object().and_then(|m| m.get(*source)).and_then(as_text) else {
                return false;
            };
            let Some(m) = digits.find(&input_val) else { return false };
            ex.output
                .as_object()
                .and_then(|m| m.get(out_name))
                .and_then(as_text)
                .map(|s| s == m.as_str())
                .unwrap_or(false)
        });
        if conf >= 0.999 {
            return Some(Pattern::new(
                PatternKind::Substring {
                    source: source.to_string(),
                    rule: SubstringRule::Regex { pattern: r"\d+".to_string() },
                    into: out_name.to_string(),
                },
                conf,
            ));
        }
    }
    None
}

fn try_slice(examples: &[Example], source: &str, out_name: &str) -> Option<Pattern> {
    let first_in = examples.first()?.input.as_object()?.get(source).and_then(as_text)?;
    let first_out = examples
        .first()?
        .output
        .as_object()?
        .get(out_name)
        .and_then(as_text)?;
    let start = first_in.find(&first_out)?;
    let end = start + first_out.len();

    let conf = confidence_of(examples, out_name, |ex| {
        let Some(input_val) = ex.input.as_object().and_then(|m| m.get(source)).and_then(as_text) else {
            return false;
        };
        let slice = input_val.get(start..end.min(input_val.len()));
        let expected = ex.output.as_object().and_then(|m| m.get(out_name)).and_then(as_text);
        slice.map(|s| Some(s.to_string()) == expected).unwrap_or(false)
    });
    if conf >= 0.999 {
        Some(Pattern::new(
            PatternKind::Substring {
                source: source.to_string(),
                rule: SubstringRule::Slice { start, end: Some(end) },
                into: out_name.to_string(),
            },
            conf,
        ))
    } else {
        None
    }
}

fn try_value_map(examples: &[Example], input_schema: &Schema, out_name: &str, policy: &PatternPolicy) -> Option<Pattern> {
    for in_field in &input_schema.fields {
        let in_values = field_values(examples, Side::Input, &in_field.name);
        let out_values = field_values(examples, Side::Output, out_name);

        let mut mapping: Vec<(String, String)> = Vec::new();
        let mut consistent = true;
        let mut matched = 0usize;
        for (iv, ov) in in_values.iter().zip(out_values.iter()) {
            let (Some(iv), Some(ov)) = (iv, ov) else { continue };
            let (Some(iv_s), Some(ov_s)) = (as_text(iv), as_text(ov)) else { continue };
            if let Some((_, existing)) = mapping.iter().find(|(k, _)| *k == iv_s) {
                if *existing != ov_s {
                    consistent = false;
                    break;
                }
            } else {
                mapping.push((iv_s, ov_s));
            }
            matched += 1;
        }
        if !consistent || mapping.len() > policy.value_map_max_cardinality || mapping.is_empty() {
            continue;
        }
        let distinct_outputs: std::collections::HashSet<&str> =
            mapping.iter().map(|(_, v)| v.as_str()).collect();
        if distinct_outputs.len() != mapping.len() {
            continue; // not one-to-one
        }
        let conf = matched as f64 / examples.len().max(1) as f64;
        if conf >= 0.999 {
            return Some(Pattern::new(
                PatternKind::ValueMap { source: in_field.name.clone(), into: out_name.to_string(), mapping },
                conf,
            ));
        }
    }
    None
}
