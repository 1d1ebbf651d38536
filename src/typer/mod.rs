//! # Identifier Typing Conventions
//!
//! Textbook logic rarely annotates identifiers with types; instead it fixes
//! conventions such as "`x`, `y`, `z` are variables over entities" or "`P` and
//! `Q` are one-place predicates". An [`IdentifierTyper`] holds such conventions
//! as an ordered list of [`TypingRule`]s. Lookups scan from the newest rule
//! backwards, so a later rule overrides an earlier one.
//!
//! ## Default conventions
//!
//! ```text
//! constants of type e:       a-e
//! constants of type <e,t>:   P-Q
//! constants of type <e*e,t>: R-S
//! variables of type e:       u-z
//! variables of type <e,t>:   U-Z
//! ```
//!
//! Conventions can also be read from text, see [`IdentifierTyper::from_conventions`].

mod conventions;

use std::fmt;

use crate::types::{E, T, Type};

pub use conventions::ConventionsError;

/// Which identifiers a rule covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Single letters from `start` to `end` inclusive, optionally followed by
    /// primes or digits (`x`, `x'`, `x2`).
    Range(char, char),
    /// Exactly this identifier.
    Exact(String),
}

impl Pattern {
    pub fn matches(&self, identifier: &str) -> bool {
        match self {
            Pattern::Exact(name) => name == identifier,
            Pattern::Range(start, end) => {
                let stem = identifier.trim_end_matches(|c: char| c == '\'' || c.is_ascii_digit());
                let mut chars = stem.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.is_alphabetic() && *start <= c && c <= *end,
                    _ => false,
                }
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pattern::Range(start, end) if start == end => write!(f, "{}", start),
            Pattern::Range(start, end) => write!(f, "{}-{}", start, end),
            Pattern::Exact(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingRule {
    pub pattern: Pattern,
    pub is_variable: bool,
    pub ty: Type,
    pub description: String,
}

impl TypingRule {
    pub fn new(pattern: Pattern, is_variable: bool, ty: Type) -> Self {
        let description = format!(
            "{} of type {}: {}",
            if is_variable { "variables" } else { "constants" },
            ty,
            pattern
        );
        TypingRule {
            pattern,
            is_variable,
            ty,
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierTyper {
    rules: Vec<TypingRule>,
}

impl Default for IdentifierTyper {
    fn default() -> Self {
        let pairs = Type::product(vec![E, E]);
        let mut typer = IdentifierTyper::empty();
        typer.add_rule(TypingRule::new(Pattern::Range('a', 'e'), false, E));
        typer.add_rule(TypingRule::new(Pattern::Range('P', 'Q'), false, Type::set_of(E)));
        typer.add_rule(TypingRule::new(Pattern::Range('R', 'S'), false, Type::set_of(pairs)));
        typer.add_rule(TypingRule::new(Pattern::Range('u', 'z'), true, E));
        typer.add_rule(TypingRule::new(Pattern::Range('U', 'Z'), true, Type::composite(E, T)));
        typer
    }
}

impl IdentifierTyper {
    /// A typer that knows nothing; every identifier needs an explicit type.
    pub fn empty() -> Self {
        IdentifierTyper { rules: vec![] }
    }

    pub fn rules(&self) -> &[TypingRule] {
        &self.rules
    }

    pub fn add_rule(&mut self, rule: TypingRule) {
        self.rules.push(rule);
    }

    /// Add a rule for exactly `name`, overriding anything before it.
    pub fn add_exact(&mut self, name: impl Into<String>, is_variable: bool, ty: Type) {
        self.add_rule(TypingRule::new(Pattern::Exact(name.into()), is_variable, ty));
    }

    /// The newest rule covering `identifier`.
    pub fn lookup(&self, identifier: &str) -> Option<&TypingRule> {
        self.rules.iter().rev().find(|rule| rule.pattern.matches(identifier))
    }

    pub fn is_variable(&self, identifier: &str) -> Option<bool> {
        self.lookup(identifier).map(|rule| rule.is_variable)
    }

    pub fn type_of(&self, identifier: &str) -> Option<&Type> {
        self.lookup(identifier).map(|rule| &rule.ty)
    }
}

impl fmt::Display for IdentifierTyper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let typer = IdentifierTyper::default();
        assert_eq!(typer.type_of("a"), Some(&E));
        assert_eq!(typer.is_variable("a"), Some(false));
        assert_eq!(typer.type_of("P"), Some(&Type::composite(E, T)));
        assert_eq!(
            typer.type_of("R"),
            Some(&Type::set_of(Type::product(vec![E, E])))
        );
    }

    #[test]
    fn test_default_variables() {
        let typer = IdentifierTyper::default();
        assert_eq!(typer.is_variable("x"), Some(true));
        assert_eq!(typer.type_of("X"), Some(&Type::composite(E, T)));
    }

    #[test]
    fn test_range_allows_primes_and_digits() {
        let typer = IdentifierTyper::default();
        assert_eq!(typer.is_variable("x'"), Some(true));
        assert_eq!(typer.is_variable("x12"), Some(true));
        assert_eq!(typer.is_variable("x'2'"), Some(true));
    }

    #[test]
    fn test_range_rejects_longer_names() {
        let typer = IdentifierTyper::default();
        assert_eq!(typer.lookup("xy"), None);
        assert_eq!(typer.lookup("man"), None);
        assert_eq!(typer.lookup("f"), None);
    }

    #[test]
    fn test_later_rules_override() {
        let mut typer = IdentifierTyper::default();
        typer.add_exact("x", false, T);
        assert_eq!(typer.is_variable("x"), Some(false));
        assert_eq!(typer.type_of("x"), Some(&T));
        assert_eq!(typer.is_variable("y"), Some(true));
    }

    #[test]
    fn test_clone_is_independent() {
        let typer = IdentifierTyper::default();
        let mut scoped = typer.clone();
        scoped.add_exact("f", true, Type::composite(E, E));
        assert!(scoped.lookup("f").is_some());
        assert!(typer.lookup("f").is_none());
    }

    #[test]
    fn test_display_lists_rules() {
        let text = IdentifierTyper::default().to_string();
        assert!(text.contains("constants of type <e,t>: P-Q"));
        assert!(text.contains("variables of type e: u-z"));
    }
}
