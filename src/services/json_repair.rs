use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

use crate::services::normalizer::extract_brace_span;

const SAMPLE_LEN: usize = 300;
const PATCH_WINDOW: usize = 20;

/// Raised when every repair layer has been exhausted. Carries the last
/// parser error and a sample of the offending text for diagnosis.
#[derive(Debug)]
pub struct JsonRepairError {
    pub parser_error: String,
    pub sample: String,
}

impl JsonRepairError {
    fn new(parser_error: String, original: &str) -> Self {
        Self {
            parser_error,
            sample: head(original, SAMPLE_LEN).to_string(),
        }
    }
}

impl fmt::Display for JsonRepairError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON repair failed: {}", self.parser_error)
    }
}

impl Error for JsonRepairError {}

/// Attempts to parse model output as JSON, running increasingly invasive
/// repair layers between attempts. Cheap global rewrites run first, narrow
/// positional patches last, so a repair is unlikely to corrupt parts of the
/// document that were already fine.
pub fn repair_and_parse(candidate: &str) -> Result<Value, JsonRepairError> {
    // Layer 0: most responses are already valid JSON
    let mut last_err = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    // Layer 1: global structural rewrites
    let sanitized = sanitize(candidate);
    match serde_json::from_str::<Value>(&sanitized) {
        Ok(value) => return Ok(value),
        Err(err) => last_err = err,
    }

    // Layer 2: escape quotes embedded in string values
    let escaped = escape_embedded_quotes(&sanitized);
    match serde_json::from_str::<Value>(&escaped) {
        Ok(value) => return Ok(value),
        Err(err) => last_err = err,
    }

    // Layer 3: patch a small window around the reported error position
    let offset = error_offset(&escaped, &last_err);
    let patched = patch_error_window(&escaped, offset);
    match serde_json::from_str::<Value>(&patched) {
        Ok(value) => return Ok(value),
        Err(err) => last_err = err,
    }

    // Layer 4: sanitization may have revealed a cleaner object boundary
    if let Some(span) = extract_brace_span(&escaped) {
        let narrowed = escape_embedded_quotes(&sanitize(span));
        match serde_json::from_str::<Value>(&narrowed) {
            Ok(value) => return Ok(value),
            Err(err) => last_err = err,
        }
    }

    Err(JsonRepairError::new(last_err.to_string(), candidate))
}

/// Layer 1: the fixed-order chain of structural rewrites. Later rules
/// assume the earlier ones already ran.
pub fn sanitize(text: &str) -> String {
    let passes: [fn(&str) -> String; 7] = [
        flatten_newlines,
        requote_single_quoted_keys,
        strip_trailing_commas,
        quote_bare_keys,
        requote_single_quoted_values,
        strip_parenthetical_comments,
        trim_padded_quotes,
    ];
    passes
        .iter()
        .fold(text.to_string(), |acc, pass| pass(&acc))
}

/// Literal line breaks inside string values are illegal JSON.
pub fn flatten_newlines(text: &str) -> String {
    text.replace('\r', " ").replace('\n', " ")
}

/// `'name':` -> `"name":` for JavaScript-style object literals.
pub fn requote_single_quoted_keys(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"'([^']*)'\s*:").unwrap());
    re.replace_all(text, "\"$1\":").into_owned()
}

/// Drops commas that directly precede a closing `]` or `}`.
pub fn strip_trailing_commas(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r",\s*([\]}])").unwrap());
    re.replace_all(text, "$1").into_owned()
}

/// Quotes bare identifier keys: `{name: ...}` -> `{"name": ...}`.
pub fn quote_bare_keys(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap());
    re.replace_all(text, "$1\"$2\":").into_owned()
}

/// Converts remaining single-quoted scalar values to double-quoted ones.
///
/// This one cannot be a regex: an apostrophe inside the value ("Avenue
/// d'Alger") looks exactly like a closing delimiter. The scan only accepts
/// a closing quote whose next non-whitespace character ends a value
/// (`,`, `}`, `]` or end of input); embedded double quotes in the content
/// get escaped on the way through.
pub fn requote_single_quoted_values(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' && in_value_position(&out) {
            if let Some(end) = closing_single_quote(&chars, i + 1) {
                out.push('"');
                for &inner in &chars[i + 1..end] {
                    if inner == '"' {
                        out.push('\\');
                    }
                    out.push(inner);
                }
                out.push('"');
                i = end + 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

fn in_value_position(emitted: &str) -> bool {
    matches!(
        emitted.trim_end().chars().last(),
        Some(':') | Some('[') | Some(',')
    )
}

// A quote closes the value when the next non-whitespace character could
// legally follow one. `(` counts as well: the model's parenthetical asides
// sit between a value and its comma, and the aside stripper runs next.
fn closing_single_quote(chars: &[char], from: usize) -> Option<usize> {
    for i in from..chars.len() {
        if chars[i] != '\'' {
            continue;
        }
        let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
        match next {
            None => return Some(i),
            Some(&ch) if matches!(ch, ',' | '}' | ']' | '(') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Removes parenthetical asides the model appends after a value, e.g.
/// `"ticketPrice": "70 MAD" (student discount available)`.
pub fn strip_parenthetical_comments(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"(["0-9])\s*\([^()]*\)"#).unwrap());
    re.replace_all(text, "$1").into_owned()
}

/// Normalizes accidental whitespace immediately inside quotes. Both rules
/// anchor on structural punctuation so spaces in the middle of a string
/// value are never touched: padding after an opening quote (one that
/// follows `:`, `[` or `,`) and padding before a closing quote (one that
/// precedes `,`, `}` or `]`).
pub fn trim_padded_quotes(text: &str) -> String {
    static OPENING: OnceLock<Regex> = OnceLock::new();
    static CLOSING: OnceLock<Regex> = OnceLock::new();
    let opening = OPENING.get_or_init(|| Regex::new(r#"([:\[,]\s*)"\s+"#).unwrap());
    let closing = CLOSING.get_or_init(|| Regex::new(r#"\s+"(\s*[,}\]])"#).unwrap());
    let out = opening.replace_all(text, "$1\"").into_owned();
    closing.replace_all(&out, "\"$1").into_owned()
}

/// Layer 2: a character-level scan that tracks string state (outside /
/// inside / after a backslash escape) and escapes double quotes embedded in
/// string content. A quote only terminates the string when the next
/// non-whitespace character could legally follow a string value or key.
/// Apostrophes and backticks are legal inside JSON strings once Layer 1 has
/// normalized the delimiters, so they pass through untouched.
pub fn escape_embedded_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut in_string = false;
    let mut after_escape = false;

    for (i, &c) in chars.iter().enumerate() {
        if after_escape {
            out.push(c);
            after_escape = false;
            continue;
        }

        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        match c {
            '\\' => {
                out.push(c);
                after_escape = true;
            }
            '"' => {
                if terminates_string(&chars, i) {
                    in_string = false;
                    out.push(c);
                } else {
                    out.push('\\');
                    out.push('"');
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn terminates_string(chars: &[char], idx: usize) -> bool {
    match chars[idx + 1..].iter().find(|ch| !ch.is_whitespace()) {
        None => true,
        Some(&next) => matches!(next, ',' | '}' | ']' | ':'),
    }
}

/// Layer 3: convert the parser's reported line/column to a byte offset.
pub fn error_offset(text: &str, err: &serde_json::Error) -> usize {
    let line = err.line().max(1);
    let column = err.column().max(1);

    let mut offset = 0;
    for (i, l) in text.split('\n').enumerate() {
        if i + 1 == line {
            return (offset + (column - 1).min(l.len())).min(text.len());
        }
        offset += l.len() + 1;
    }
    text.len()
}

/// Layer 3: apply the local pattern fixes to a small window around the
/// error offset, leaving the rest of the document untouched.
pub fn patch_error_window(text: &str, offset: usize) -> String {
    let start = floor_boundary(text, offset.saturating_sub(PATCH_WINDOW));
    let end = ceil_boundary(text, (offset + PATCH_WINDOW).min(text.len()));

    let patched = apply_local_fixes(&text[start..end]);
    format!("{}{}{}", &text[..start], patched, &text[end..])
}

fn apply_local_fixes(window: &str) -> String {
    static WORD_QUOTE: OnceLock<Regex> = OnceLock::new();
    static DIGIT_QUOTE: OnceLock<Regex> = OnceLock::new();
    static WORD_APOSTROPHE: OnceLock<Regex> = OnceLock::new();

    // A quote wedged between word characters
    let word_quote = WORD_QUOTE.get_or_init(|| Regex::new(r#"(\w)"(\w)"#).unwrap());
    // A digit directly followed by a stray quote
    let digit_quote = DIGIT_QUOTE.get_or_init(|| Regex::new(r#"([0-9])"(\s*\w)"#).unwrap());
    // An apostrophe between two word characters
    let word_apostrophe = WORD_APOSTROPHE.get_or_init(|| Regex::new(r"(\w)'(\w)").unwrap());

    let out = word_quote.replace_all(window, "$1\\\"$2").into_owned();
    let out = digit_quote.replace_all(&out, "$1\\\"$2").into_owned();
    word_apostrophe.replace_all(&out, "$1\\'$2").into_owned()
}

fn head(text: &str, limit: usize) -> &str {
    &text[..ceil_boundary(text, text.len().min(limit)).min(text.len())]
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json_is_returned_untouched() {
        let input = r#"{"a": 1, "b": [true, null], "c": "x y"}"#;
        let value = repair_and_parse(input).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(input).unwrap());
    }

    #[test]
    fn test_trailing_comma_in_object() {
        let value = repair_and_parse(r#"{"a":1,}"#).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_trailing_comma_in_array() {
        let value = repair_and_parse("[1,2,]").unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_unquoted_keys() {
        let value = repair_and_parse(r#"{name: "x", count: 2}"#).unwrap();
        assert_eq!(value, json!({"name": "x", "count": 2}));
    }

    #[test]
    fn test_single_quoted_document() {
        let value = repair_and_parse(r#"{'name': 'Riad Yasmine', 'rating': 4}"#).unwrap();
        assert_eq!(value, json!({"name": "Riad Yasmine", "rating": 4}));
    }

    #[test]
    fn test_apostrophe_survives_single_quote_conversion() {
        let value = repair_and_parse(r#"{'address': 'Avenue d'Alger'}"#).unwrap();
        assert_eq!(value["address"], json!("Avenue d'Alger"));
    }

    #[test]
    fn test_apostrophe_in_double_quoted_value_is_untouched() {
        let input = r#"{"address": "Avenue d'Alger", "extra": 1,}"#;
        let value = repair_and_parse(input).unwrap();
        assert_eq!(value["address"], json!("Avenue d'Alger"));
    }

    #[test]
    fn test_embedded_double_quotes_are_escaped() {
        let value = repair_and_parse(r#"{"name": "Riad "El" Fenn", "rating": 5,}"#).unwrap();
        assert_eq!(value["name"], json!("Riad \"El\" Fenn"));
    }

    #[test]
    fn test_newlines_inside_string_values() {
        let value = repair_and_parse("{\"description\": \"first\nsecond\"}").unwrap();
        assert_eq!(value["description"], json!("first second"));
    }

    #[test]
    fn test_parenthetical_comment_after_value() {
        let value =
            repair_and_parse(r#"{"ticketPrice": "70 MAD" (student discount), "open": true}"#)
                .unwrap();
        assert_eq!(value["ticketPrice"], json!("70 MAD"));
        assert_eq!(value["open"], json!(true));
    }

    #[test]
    fn test_parenthetical_comment_after_number() {
        let value = repair_and_parse(r#"{"rating": 4 (out of 5), "open": true}"#).unwrap();
        assert_eq!(value["rating"], json!(4));
    }

    #[test]
    fn test_single_quoted_value_with_parenthetical_aside() {
        let value =
            repair_and_parse(r#"{'ticketPrice': '70 MAD' (students 35 MAD), 'open': true,}"#)
                .unwrap();
        assert_eq!(value["ticketPrice"], json!("70 MAD"));
        assert_eq!(value["open"], json!(true));
    }

    #[test]
    fn test_legit_parentheses_inside_strings_survive() {
        let input = r#"{"bestTimeToVisit": "Spring (March to May)", "n": 1,}"#;
        let value = repair_and_parse(input).unwrap();
        assert_eq!(value["bestTimeToVisit"], json!("Spring (March to May)"));
    }

    #[test]
    fn test_unrecoverable_input_reports_diagnostics() {
        let err = repair_and_parse("the model refused to answer").unwrap_err();
        assert!(!err.parser_error.is_empty());
        assert!(err.sample.contains("the model refused"));
    }

    #[test]
    fn test_sample_is_capped() {
        let long = "x".repeat(2000);
        let err = repair_and_parse(&long).unwrap_err();
        assert!(err.sample.len() <= 300);
    }

    #[test]
    fn test_flatten_newlines() {
        assert_eq!(flatten_newlines("a\r\nb\nc"), "a  b c");
    }

    #[test]
    fn test_requote_single_quoted_keys() {
        assert_eq!(
            requote_single_quoted_keys(r#"{'a': 1, 'b': 2}"#),
            r#"{"a": 1, "b": 2}"#
        );
    }

    #[test]
    fn test_strip_trailing_commas_nested() {
        assert_eq!(
            strip_trailing_commas(r#"{"a": [1, 2, ], "b": {"c": 3,},}"#),
            r#"{"a": [1, 2], "b": {"c": 3}}"#
        );
    }

    #[test]
    fn test_quote_bare_keys_leaves_quoted_keys_alone() {
        assert_eq!(
            quote_bare_keys(r#"{name: 1, "kept": 2}"#),
            r#"{"name": 1, "kept": 2}"#
        );
    }

    #[test]
    fn test_requote_values_keeps_sibling_values_separate() {
        assert_eq!(
            requote_single_quoted_values(r#"{"a": 'x', "b": 'y'}"#),
            r#"{"a": "x", "b": "y"}"#
        );
    }

    #[test]
    fn test_requote_values_escapes_embedded_double_quotes() {
        assert_eq!(
            requote_single_quoted_values(r#"{"a": 'say "hi"'}"#),
            r#"{"a": "say \"hi\""}"#
        );
    }

    #[test]
    fn test_trim_padded_quotes() {
        assert_eq!(trim_padded_quotes(r#"{"a": "  x"}"#), r#"{"a": "x"}"#);
        assert_eq!(trim_padded_quotes(r#"{"a": "x  "}"#), r#"{"a": "x"}"#);
        // Interior spaces are content, not padding
        assert_eq!(trim_padded_quotes(r#"{"a": "x  y"}"#), r#"{"a": "x  y"}"#);
    }

    #[test]
    fn test_escape_embedded_quotes_tracks_escape_state() {
        // Already-escaped quotes must not be double-escaped
        let input = r#"{"a": "say \"hi\" now"}"#;
        assert_eq!(escape_embedded_quotes(input), input);
    }

    #[test]
    fn test_error_offset_single_line() {
        let text = r#"{"a": }"#;
        let err = serde_json::from_str::<Value>(text).unwrap_err();
        let offset = error_offset(text, &err);
        assert!(offset <= text.len());
        assert!(offset >= 5);
    }

    #[test]
    fn test_patch_window_is_scoped() {
        // The stray quote sits in the window; distant text is untouched
        let text = r#"{"name": "Dar an"Nasr", "city": "Fes"}"#;
        let err = serde_json::from_str::<Value>(text).unwrap_err();
        let patched = patch_error_window(text, error_offset(text, &err));
        assert!(patched.contains(r#""city": "Fes""#));
        let value = serde_json::from_str::<Value>(&patched).unwrap();
        assert_eq!(value["name"], json!("Dar an\"Nasr"));
    }

    #[test]
    fn test_layer4_recovers_object_revealed_by_sanitization() {
        let input = "Sure! Here it is: {'a': 1,} enjoy";
        // Normalizer output would still carry prose if fences hid the braces;
        // the engine itself must cope with a sanitized-but-wrapped object
        let value = repair_and_parse(input).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }
}
