//! Free-text sanitization for label filters.

/// Collapse newlines, carriage returns, tabs, other control characters and
/// runs of whitespace into single spaces, then trim both ends.
///
/// `sanitize(sanitize(x)) == sanitize(x)` for every input.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() || ch.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

/// One sanitized label-filter term.
///
/// Keeps track of whether the caller's raw input ended in whitespace: in that
/// case the final token is complete and must not be matched as a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm {
    text: String,
    complete_final_token: bool,
}

impl SearchTerm {
    /// Sanitize a raw term. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = sanitize(raw);
        if text.is_empty() {
            return None;
        }
        let complete_final_token = raw
            .chars()
            .next_back()
            .is_some_and(|c| c.is_whitespace() || c.is_control());
        Some(Self {
            text,
            complete_final_token,
        })
    }

    /// The sanitized text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the raw input ended in whitespace
    pub fn complete_final_token(&self) -> bool {
        self.complete_final_token
    }

    /// Whitespace-separated tokens of the sanitized text
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split(' ')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_line_breaks() {
        assert_eq!(sanitize("Green\n\rGoblin"), "Green Goblin");
        assert_eq!(sanitize("  a\t\tb \u{0007} c  "), "a b c");
        assert_eq!(sanitize("\n\r\t"), "");
    }

    #[test]
    fn idempotent() {
        for input in ["Green\n\rGoblin", "  x  y ", "", "\u{0000}a\u{001F}b", "plain"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn trailing_whitespace_marks_complete_token() {
        let term = SearchTerm::parse("Green Go ").unwrap();
        assert_eq!(term.text(), "Green Go");
        assert!(term.complete_final_token());

        let term = SearchTerm::parse("Green Go").unwrap();
        assert!(!term.complete_final_token());

        let term = SearchTerm::parse("Green Go\n").unwrap();
        assert!(term.complete_final_token());
    }

    #[test]
    fn blank_terms_rejected() {
        assert!(SearchTerm::parse("   ").is_none());
        assert!(SearchTerm::parse("").is_none());
    }

    #[test]
    fn tokens_split_on_single_spaces() {
        let term = SearchTerm::parse(" green \t goblin ").unwrap();
        assert_eq!(term.tokens().collect::<Vec<_>>(), vec!["green", "goblin"]);
    }
}
