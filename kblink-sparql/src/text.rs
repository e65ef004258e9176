//! Low-level SPARQL text writers.
//!
//! Everything that ends up verbatim in compiled query text goes through one of
//! these functions. Builder inputs and profiles are validated before
//! execution. `iri()` still percent-encodes anything `IRIREF` forbids, so text
//! from an unvalidated profile stays inside its angle brackets.

use std::fmt::Write as _;

/// Variable names shared between the compiler and the result mapper.
pub mod vars {
    /// The resource being listed
    pub const SUBJECT: &str = "s";
    /// Display label candidate
    pub const LABEL: &str = "l";
    /// Literal that satisfied a label filter
    pub const MATCH: &str = "m";
    /// Description candidate
    pub const DESCRIPTION: &str = "d";
    /// Declared domain
    pub const DOMAIN: &str = "dom";
    /// Declared range
    pub const RANGE: &str = "rng";
    /// Deprecation value
    pub const DEPRECATED: &str = "dep";
    /// Sub-property discovered by the label property lookup
    pub const PROPERTY: &str = "p";
}

/// Deterministic generator of scratch variable names (`_v0`, `_v1`, ...).
///
/// Scratch names start with an underscore so they never collide with the
/// names in [`vars`].
#[derive(Debug, Default)]
pub struct FreshVars {
    next: usize,
}

impl FreshVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused name, without the leading `?`
    pub fn fresh(&mut self) -> String {
        let name = format!("_v{}", self.next);
        self.next += 1;
        name
    }
}

fn forbidden_in_iri(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

/// Render an absolute IRI as `<iri>`.
pub fn iri(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('<');
    for ch in value.chars() {
        if forbidden_in_iri(ch) {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                write!(out, "%{:02X}", byte).unwrap();
            }
        } else {
            out.push(ch);
        }
    }
    out.push('>');
    out
}

/// Render a variable name as `?name`.
pub fn var(name: &str) -> String {
    format!("?{}", name)
}

/// Render a plain string literal with SPARQL escapes applied.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                write!(out, "\\u{:04X}", c as u32).unwrap();
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape XPath regular-expression metacharacters so `value` matches literally.
///
/// The result still has to be wrapped with [`string_literal`], which doubles
/// every backslash introduced here.
pub fn regex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(
            ch,
            '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '-'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// A property path alternative over one or more IRIs: `<a>` or `(<a>|<b>)`.
pub fn alternative_path<S: AsRef<str>>(iris: &[S]) -> String {
    match iris {
        [single] => iri(single.as_ref()),
        _ => {
            let parts: Vec<String> = iris.iter().map(|i| iri(i.as_ref())).collect();
            format!("({})", parts.join("|"))
        }
    }
}

/// Check whether a string looks like an absolute IRI that can be embedded
/// between angle brackets without further escaping.
///
/// Requires a scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`) followed by
/// `:` and rejects characters that SPARQL forbids inside `IRIREF`.
pub fn is_absolute_iri(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };
    let mut scheme_chars = scheme.chars();
    let scheme_ok = scheme_chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && !rest.is_empty() && !value.chars().any(forbidden_in_iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_cannot_break_out_of_brackets() {
        assert_eq!(iri("http://example.org/kb#x"), "<http://example.org/kb#x>");
        assert_eq!(
            iri("http://x/a> } DROP ALL { <b"),
            "<http://x/a%3E%20%7D%20DROP%20ALL%20%7B%20%3Cb>"
        );
    }

    #[test]
    fn literal_escapes_quotes_and_newlines() {
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(string_literal("a\nb"), "\"a\\nb\"");
        assert_eq!(string_literal("back\\slash"), "\"back\\\\slash\"");
    }

    #[test]
    fn literal_cannot_break_out_of_query() {
        let hostile = "x\" } ; DROP ALL ; SELECT * { \"";
        let lit = string_literal(hostile);
        // Every inner quote is escaped, so the literal is a single token.
        let inner = &lit[1..lit.len() - 1];
        assert!(inner.match_indices('"').all(|(i, _)| &inner[i - 1..i] == "\\"));
    }

    #[test]
    fn regex_escape_metacharacters() {
        assert_eq!(regex_escape("a.b"), "a\\.b");
        assert_eq!(regex_escape("(x)"), "\\(x\\)");
        assert_eq!(regex_escape("plain text"), "plain text");
    }

    #[test]
    fn alternative_path_rendering() {
        assert_eq!(alternative_path(&["http://a/x"]), "<http://a/x>");
        assert_eq!(
            alternative_path(&["http://a/x", "http://a/y"]),
            "(<http://a/x>|<http://a/y>)"
        );
    }

    #[test]
    fn fresh_vars_are_sequential() {
        let mut vars = FreshVars::new();
        assert_eq!(vars.fresh(), "_v0");
        assert_eq!(vars.fresh(), "_v1");
    }

    #[test]
    fn absolute_iri_check() {
        assert!(is_absolute_iri("http://example.org/kb#green-goblin"));
        assert!(is_absolute_iri("urn:isbn:123"));
        assert!(is_absolute_iri("bif:contains"));
        assert!(!is_absolute_iri("#green-goblin"));
        assert!(!is_absolute_iri("relative/path"));
        assert!(!is_absolute_iri("http://example.org/a b"));
        assert!(!is_absolute_iri("http://example.org/>{"));
        assert!(!is_absolute_iri("1http://x"));
    }
}
