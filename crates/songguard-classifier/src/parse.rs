//! Defensive decoding of model output into a verdict

use crate::error::ClassifierError;
use crate::verdict::SentimentVerdict;
use regex::Regex;
use std::sync::OnceLock;

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json)?\s*|\s*```").expect("static regex"))
}

/// Strip markdown code fences from raw model output.
pub fn strip_fences(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").into_owned()
}

/// Find the first balanced `{...}` block, ignoring braces inside strings.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode raw model output into a verdict.
///
/// Accepts bare JSON, fenced JSON and JSON surrounded by prose. Anything that
/// is not an object with a valid verdict shape is `Malformed`.
pub fn parse_verdict(raw: &str) -> Result<SentimentVerdict, ClassifierError> {
    let unfenced = strip_fences(raw);
    let candidate = extract_json_block(&unfenced).unwrap_or(unfenced.trim());

    let value: serde_json::Value = serde_json::from_str(candidate)
        .map_err(|e| ClassifierError::Malformed(format!("{}: {}", e, preview(candidate))))?;

    if !value.is_object() {
        return Err(ClassifierError::Malformed(format!(
            "expected object, got {}",
            preview(candidate)
        )));
    }

    serde_json::from_value::<SentimentVerdict>(value)
        .map(SentimentVerdict::clamped)
        .map_err(|e| ClassifierError::Malformed(e.to_string()))
}

fn preview(s: &str) -> String {
    s.chars().take(80).collect()
}
