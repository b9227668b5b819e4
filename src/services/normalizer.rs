/// Best-effort cleanup of raw model output before any parse attempt.
/// Strips markdown code fences and, when prose surrounds the payload,
/// extracts the first-`{`-to-last-`}` span. Never fails: when no object
/// span exists the trimmed input comes back unchanged and the repair
/// engine reports the failure instead.
pub fn normalize_response(raw: &str) -> String {
    let stripped = strip_code_fences(raw);
    match extract_brace_span(&stripped) {
        Some(span) => span.trim().to_string(),
        None => stripped.trim().to_string(),
    }
}

/// Removes a leading ``` or ```json fence and a trailing ``` fence.
pub fn strip_code_fences(text: &str) -> String {
    let mut trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```json") {
        trimmed = rest.trim_start();
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        trimmed = rest.trim_start();
    }

    if let Some(rest) = trimmed.strip_suffix("```") {
        trimmed = rest.trim_end();
    }

    trimmed.to_string()
}

/// Greedy span from the first `{` to the last `}`. Returns None when the
/// text holds no such span.
pub fn extract_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
