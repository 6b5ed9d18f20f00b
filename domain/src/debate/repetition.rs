//! Repetition stop rule.
//!
//! A debate stuck in a loop wastes calls. After each reply the batch runner
//! compares it against the replies just before it; when enough of them are
//! near-identical the run stops.

use super::message::Message;

/// Stop rule configuration (Value Object)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepetitionRule {
    /// How many of the preceding entries must be similar to trigger a stop.
    /// `0` disables the rule.
    pub stop_on_repeat: usize,
    /// Similarity ratio in `[0, 1]` at or above which two replies count as repeats.
    pub threshold: f64,
}

impl Default for RepetitionRule {
    fn default() -> Self {
        Self {
            stop_on_repeat: 2,
            threshold: 0.88,
        }
    }
}

impl RepetitionRule {
    pub fn disabled() -> Self {
        Self {
            stop_on_repeat: 0,
            ..Self::default()
        }
    }

    /// Count how many of the `stop_on_repeat` entries preceding the last one
    /// are similar to it, returning the count when it reaches the limit.
    pub fn check(&self, history: &[Message]) -> Option<usize> {
        if self.stop_on_repeat == 0 || history.len() < self.stop_on_repeat + 1 {
            return None;
        }

        let (latest, earlier) = history.split_last()?;
        let latest = latest.content.trim();
        let similar = earlier[earlier.len() - self.stop_on_repeat..]
            .iter()
            .filter(|m| similarity(m.content.trim(), latest) >= self.threshold)
            .count();

        (similar >= self.stop_on_repeat).then_some(similar)
    }
}

/// Character-level similarity ratio `2·LCS / (|a| + |b|)`.
///
/// Returns `1.0` for two empty strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // Rolling single-row LCS table
    let mut row = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut diagonal = 0;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    (2 * row[b.len()]) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(contents: &[&str]) -> Vec<Message> {
        contents.iter().map(|c| Message::system(*c)).collect()
    }

    #[test]
    fn test_similarity_identical_and_disjoint() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_similarity_partial() {
        // LCS("abcd", "abxd") = 3 → 6 / 8
        assert!((similarity("abcd", "abxd") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_check_triggers_on_repeats() {
        let rule = RepetitionRule::default();
        let history = msgs(&[
            "We must act now on climate.",
            "We must act now on climate!",
            "We must act now on climate.",
        ]);
        assert_eq!(rule.check(&history), Some(2));
    }

    #[test]
    fn test_check_needs_enough_history() {
        let rule = RepetitionRule::default();
        assert_eq!(rule.check(&msgs(&["same", "same"])), None);
    }

    #[test]
    fn test_check_ignores_varied_replies() {
        let rule = RepetitionRule::default();
        let history = msgs(&[
            "Nuclear power is the answer.",
            "Solar has become far cheaper.",
            "Wind needs storage to be viable.",
        ]);
        assert_eq!(rule.check(&history), None);
    }

    #[test]
    fn test_disabled_rule_never_triggers() {
        let history = msgs(&["x", "x", "x", "x"]);
        assert_eq!(RepetitionRule::disabled().check(&history), None);
    }
}
