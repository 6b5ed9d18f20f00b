//! Bounded history window.
//!
//! Each turn sees only the tail of the transcript. The window never
//! reorders or summarizes; it only cuts older entries off.

use crate::debate::message::Message;

/// The last `limit` messages in chronological order.
///
/// Identity when the history is not longer than `limit`.
pub fn window(history: &[Message], limit: usize) -> &[Message] {
    if history.len() <= limit {
        return history;
    }
    &history[history.len() - limit..]
}

/// Render entries oldest first as `"<sender>: <content>"`, separated by a
/// blank line.
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.sender_name, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render entries newest first, one line each, with embedded newlines folded
/// to spaces. Used by the batch runner.
pub fn format_transcript_recent_first(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .map(|m| format!("{}: {}", m.sender_name, m.content.replace('\n', " ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::config::AgentConfig;

    fn history(n: usize) -> Vec<Message> {
        let agent = AgentConfig::new("a", "Alice", "").unwrap();
        (0..n)
            .map(|i| Message::from_agent(&agent, format!("m{i}")))
            .collect()
    }

    #[test]
    fn test_window_returns_tail_in_order() {
        let h = history(10);
        let w = window(&h, 3);
        assert_eq!(w.len(), 3);
        assert_eq!(
            w.iter().map(|m| m.content.as_str()).collect::<Vec<_>>(),
            vec!["m7", "m8", "m9"]
        );
        assert_eq!(w, &h[7..]);
    }

    #[test]
    fn test_window_identity_on_short_history() {
        let h = history(3);
        assert_eq!(window(&h, 3), h.as_slice());
        assert_eq!(window(&h, 15), h.as_slice());
        assert!(window(&[], 5).is_empty());
    }

    #[test]
    fn test_window_zero_limit() {
        let h = history(4);
        assert!(window(&h, 0).is_empty());
    }

    #[test]
    fn test_format_transcript_chronological() {
        let h = history(2);
        assert_eq!(format_transcript(&h), "Alice: m0\n\nAlice: m1");
    }

    #[test]
    fn test_format_transcript_recent_first() {
        let agent = AgentConfig::new("b", "Bob", "").unwrap();
        let h = vec![
            Message::from_agent(&agent, "first"),
            Message::from_agent(&agent, "second\nline"),
        ];
        assert_eq!(
            format_transcript_recent_first(&h),
            "Bob: second line\nBob: first"
        );
    }
}
