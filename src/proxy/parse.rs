//! Cleanup of model output

use crate::managers::CardPair;

/// First `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Remove Markdown code fences the model tends to wrap JSON in
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Card pairs from the first `[...]` span of the model output.
///
/// Anything unparsable yields an empty list. Elements without a string
/// `front` or `back` come back with that side empty.
pub fn extract_card_pairs(text: &str) -> Vec<CardPair> {
    let cleaned = strip_code_fences(text);
    let Some(span) = array_span(&cleaned) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<serde_json::Value>>(span) {
        Ok(items) => items.into_iter().map(card_from_value).collect(),
        Err(e) => {
            tracing::debug!("Model output is not a JSON array: {}", e);
            Vec::new()
        }
    }
}

fn array_span(text: &str) -> Option<&str> {
    let re = regex::Regex::new(r"\[[\s\S]*\]").ok()?;
    re.find(text).map(|m| m.as_str())
}

fn card_from_value(value: serde_json::Value) -> CardPair {
    let side = |key: &str| {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };
    CardPair {
        front: side("front"),
        back: side("back"),
    }
}
