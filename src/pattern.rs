//! Command pattern matching.
//!
//! A [`CommandPattern`] is a whole-string matcher over command text with
//! optional named capture groups. Anchoring is applied by the type itself,
//! so a pattern can never silently match a prefix and swallow trailing text.

use regex::Regex;
use std::collections::HashMap;

/// A compiled, whole-string command pattern.
///
/// The pattern source is wrapped in `\A(?:...)\z` at compile time; authors
/// write the command shape without anchors. Named groups become extracted
/// arguments, unnamed groups are discarded.
#[derive(Debug, Clone)]
pub struct CommandPattern {
    re: Regex,
}

impl CommandPattern {
    /// Compile a pattern.
    ///
    /// # Panics
    ///
    /// Panics if the pattern does not compile. Patterns are static program
    /// data registered once at startup; a malformed pattern is a programmer
    /// error and must abort startup rather than leave a partial registry.
    pub fn new(pattern: &str) -> Self {
        let anchored = format!(r"\A(?:{pattern})\z");
        let re = Regex::new(&anchored)
            .unwrap_or_else(|e| panic!("invalid command pattern {pattern:?}: {e}"));
        Self { re }
    }

    /// Match `text` in full, returning the named captures on success.
    pub fn captures(&self, text: &str) -> Option<HashMap<String, String>> {
        let caps = self.re.captures(text)?;
        let mut vars = HashMap::new();
        for name in self.re.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                vars.insert(name.to_string(), m.as_str().to_string());
            }
        }
        Some(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_whole_string() {
        let pattern = CommandPattern::new("(balance|b)");
        assert!(pattern.captures("balance").is_some());
        assert!(pattern.captures("b").is_some());
        assert!(pattern.captures("balance all").is_none());
        assert!(pattern.captures("rebalance").is_none());
        assert!(pattern.captures("").is_none());
    }

    #[test]
    fn test_named_captures_extracted() {
        let pattern = CommandPattern::new("give (?P<to>.*) (?P<amount>[0-9]*)");
        let vars = pattern.captures("give @bob 10").unwrap();
        assert_eq!(vars.get("to").map(String::as_str), Some("@bob"));
        assert_eq!(vars.get("amount").map(String::as_str), Some("10"));
    }

    #[test]
    fn test_unnamed_groups_discarded() {
        let pattern = CommandPattern::new("(give|g) (?P<to>.*)");
        let vars = pattern.captures("g @bob").unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("to").map(String::as_str), Some("@bob"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let pattern = CommandPattern::new("(balance|b)");
        assert!(pattern.captures("Balance").is_none());
        assert!(pattern.captures("B").is_none());
    }

    #[test]
    #[should_panic(expected = "invalid command pattern")]
    fn test_malformed_pattern_aborts() {
        CommandPattern::new("(unclosed");
    }
}
