/// Default upper bound, in characters, for a sanitized name.
pub const DEFAULT_MAX_FILENAME_LEN: usize = 100;

const FALLBACK_NAME: &str = "unnamed";

/// Filesystem-safe name with the default length bound.
pub fn sanitize_filename(input: &str) -> String {
    sanitize_filename_with_max(input, DEFAULT_MAX_FILENAME_LEN)
}

/// Filesystem-safe name:
/// - `< > : " / \ | ? *` and whitespace runs become `_`
/// - runs of `_` collapse to one
/// - leading/trailing `_` and `.` are trimmed
/// - the result is cut to `max_len` characters
/// - an empty result becomes `unnamed`.
pub fn sanitize_filename_with_max(input: &str, max_len: usize) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = compacted.trim_matches(&['_', '.'][..]);
    let final_name: String = trimmed.chars().take(max_len).collect();
    if final_name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        final_name
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}
