//! Reply sanitization.
//!
//! Models sometimes leak their reasoning or prefix the reply with their own
//! role name. Those fragments are removed before the text becomes a stored
//! message.

use regex::Regex;
use std::sync::LazyLock;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("valid regex"));

static THOUGHT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\[THOUGHT[:\s].*?\]").expect("valid regex"));

static UNCLOSED_THINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^[A-Za-z]+:\s*<think>.*").expect("valid regex"));

static ROLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-Za-z]+:[ \t]*").expect("valid regex"));

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid regex"));

/// Strip thinking blocks, thought markers and role prefixes, then collapse
/// blank-line runs and trim.
pub fn sanitize_reply(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = THINK_BLOCK.replace_all(raw, "");
    let text = THOUGHT_MARKER.replace_all(&text, "");
    let text = UNCLOSED_THINK.replace_all(&text, "");
    let text = ROLE_PREFIX.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}
