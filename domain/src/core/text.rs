//! Small text helpers shared by logging and role parsing.

/// Shorten `s` to at most `max_chars` characters for log previews.
///
/// Appends `...` when anything was cut. Never splits a UTF-8 character.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_is_unchanged() {
        assert_eq!(preview("hello", 10), "hello");
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("hello world", 5), "hello...");
        assert_eq!(preview("あのね", 2), "あの...");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("optimist"), "Optimist");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }
}
