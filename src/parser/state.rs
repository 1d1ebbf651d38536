use crate::ast::{BinaryOp, BinderKind};

/// `\name` escapes and the glyphs they stand for.
const ESCAPES: &[(&str, char)] = &[
    ("forall", '∀'),
    ("exists", '∃'),
    ("lambda", 'λ'),
    ("iota", 'ι'),
    ("neg", '¬'),
    ("lnot", '¬'),
    ("wedge", '∧'),
    ("land", '∧'),
    ("vee", '∨'),
    ("lor", '∨'),
    ("rightarrow", '→'),
    ("to", '→'),
    ("leftrightarrow", '↔'),
    ("iff", '↔'),
    ("neq", '≠'),
    ("leq", '≤'),
    ("geq", '≥'),
    ("times", '×'),
    ("oplus", '⊕'),
    ("subseteq", '⊆'),
    ("subset", '⊂'),
    ("nsubset", '⊄'),
    ("supseteq", '⊇'),
    ("supset", '⊃'),
    ("nsupset", '⊅'),
    ("cap", '∩'),
    ("cup", '∪'),
    ("sqsubseteq", '⊑'),
    ("emptyset", '∅'),
    ("alpha", 'α'),
    ("beta", 'β'),
    ("gamma", 'γ'),
    ("delta", 'δ'),
    ("epsilon", 'ε'),
    ("zeta", 'ζ'),
    ("eta", 'η'),
    ("theta", 'θ'),
    ("kappa", 'κ'),
    ("mu", 'μ'),
    ("nu", 'ν'),
    ("xi", 'ξ'),
    ("pi", 'π'),
    ("rho", 'ρ'),
    ("sigma", 'σ'),
    ("tau", 'τ'),
    ("upsilon", 'υ'),
    ("phi", 'φ'),
    ("chi", 'χ'),
    ("psi", 'ψ'),
    ("omega", 'ω'),
    ("Gamma", 'Γ'),
    ("Delta", 'Δ'),
    ("Theta", 'Θ'),
    ("Lambda", 'Λ'),
    ("Xi", 'Ξ'),
    ("Pi", 'Π'),
    ("Sigma", 'Σ'),
    ("Phi", 'Φ'),
    ("Psi", 'Ψ'),
    ("Omega", 'Ω'),
];

/// The escape name of a glyph, `\alpha` for `α`.
pub fn escape_name(glyph: char) -> Option<&'static str> {
    ESCAPES
        .iter()
        .find(|(_, escaped)| *escaped == glyph)
        .map(|(name, _)| *name)
}

/// Keyboard spellings accepted in ASCII mode, longest first so that `<<<`
/// wins over `<<` and `<`.
const ASCII_OPERATORS: &[(&str, BinaryOp)] = &[
    ("<->", BinaryOp::Iff),
    ("<<<", BinaryOp::ProperSubset),
    ("!<<", BinaryOp::NotSubset),
    (">>>", BinaryOp::ProperSuperset),
    ("!>>", BinaryOp::NotSuperset),
    ("->", BinaryOp::If),
    ("!=", BinaryOp::NotEqual),
    ("<=", BinaryOp::LessEq),
    (">=", BinaryOp::GreaterEq),
    ("<<", BinaryOp::Subset),
    (">>", BinaryOp::Superset),
    ("@I", BinaryOp::Intersect),
    ("@U", BinaryOp::Union),
    ("<:", BinaryOp::PartOf),
    ("&", BinaryOp::And),
    ("*", BinaryOp::Multiplication),
    ("+", BinaryOp::Fusion),
];

/// The text being parsed, addressed by character position.
///
/// All lookahead goes through [`Input::glyph`], which folds `\name` escapes
/// into the character they stand for.
pub struct Input {
    chars: Vec<char>,
    ascii: bool,
}

impl Input {
    pub fn new(text: &str, ascii: bool) -> Self {
        Self {
            chars: text.chars().collect(),
            ascii,
        }
    }

    pub fn is_ascii(&self) -> bool {
        self.ascii
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    pub fn is_space(&self, pos: usize) -> bool {
        self.at(pos).is_some_and(char::is_whitespace)
    }

    pub fn skip_whitespace(&self, mut pos: usize) -> usize {
        while self.is_space(pos) {
            pos += 1;
        }
        pos
    }

    pub fn at_end(&self, pos: usize) -> bool {
        self.skip_whitespace(pos) >= self.len()
    }

    /// The logical character at `pos` and the position after it.
    pub fn glyph(&self, pos: usize) -> Option<(char, usize)> {
        let c = self.at(pos)?;
        if c == '\\' {
            if let Some(escaped) = self.escape(pos) {
                return Some(escaped);
            }
        }
        Some((c, pos + 1))
    }

    /// The longest known escape name starting after the backslash at `pos`.
    fn escape(&self, pos: usize) -> Option<(char, usize)> {
        let start = pos + 1;
        let mut end = start;
        while self.at(end).is_some_and(|c| c.is_ascii_alphabetic()) {
            end += 1;
        }
        (start + 1..=end).rev().find_map(|stop| {
            let name: String = self.chars[start..stop].iter().collect();
            ESCAPES
                .iter()
                .find(|(escape, _)| *escape == name)
                .map(|(_, glyph)| (*glyph, stop))
        })
    }

    fn matches_text(&self, pos: usize, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.at(pos + i) == Some(c))
    }

    pub fn is_identifier_start(&self, pos: usize) -> bool {
        self.glyph(pos).is_some_and(|(c, _)| is_identifier_start_char(c))
    }

    /// A negation sign at `pos`.
    pub fn negation_at(&self, pos: usize) -> Option<usize> {
        match self.glyph(pos)? {
            ('¬', next) => Some(next),
            ('~', next) if self.ascii => Some(next),
            _ => None,
        }
    }

    /// A binder symbol at `pos`. In ASCII mode `A`, `E`, `L` and `I` count as
    /// binders when an identifier follows immediately.
    pub fn binder_at(&self, pos: usize) -> Option<(BinderKind, usize)> {
        let (c, next) = self.glyph(pos)?;
        if let Some(kind) = BinderKind::from_symbol(c) {
            return Some((kind, next));
        }
        if !self.ascii || !self.is_identifier_start(next) {
            return None;
        }
        let kind = match c {
            'A' => BinderKind::ForAll,
            'E' => BinderKind::Exists,
            'L' => BinderKind::Lambda,
            'I' => BinderKind::Iota,
            _ => return None,
        };
        Some((kind, next))
    }

    /// An infix operator at `pos` and the position after it.
    pub fn operator_at(&self, pos: usize) -> Option<(BinaryOp, usize)> {
        if self.ascii {
            for (text, op) in ASCII_OPERATORS {
                if self.matches_text(pos, text) {
                    return Some((*op, pos + text.chars().count()));
                }
            }
            if self.at(pos) == Some('V') && !self.is_identifier_start(pos + 1) {
                return Some((BinaryOp::Or, pos + 1));
            }
        }
        let (c, next) = self.glyph(pos)?;
        if c == '|' {
            return Some((BinaryOp::Or, next));
        }
        BinaryOp::from_symbol(c).map(|op| (op, next))
    }
}

/// Letters (other than the binder letters λ and ι), digits and `∅`.
pub fn is_identifier_start_char(c: char) -> bool {
    (c.is_alphabetic() && c != 'λ' && c != 'ι') || c.is_ascii_digit() || c == '∅'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes() {
        let input = Input::new("\\forall x", false);
        assert_eq!(input.glyph(0), Some(('∀', 7)));
        let input = Input::new("\\lambdax", false);
        assert_eq!(input.glyph(0), Some(('λ', 7)));
        let input = Input::new("\\nothing", false);
        assert_eq!(input.glyph(0), Some(('\\', 1)));
    }

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name('φ'), Some("phi"));
        assert_eq!(escape_name('∅'), Some("emptyset"));
        assert_eq!(escape_name('x'), None);
        // Positions stay character offsets into the raw text.
        let input = Input::new("a \\wedge b", false);
        assert_eq!(input.glyph(2), Some(('∧', 8)));
    }

    #[test]
    fn test_longest_escape_wins() {
        let input = Input::new("\\subseteq", false);
        assert_eq!(input.glyph(0), Some(('⊆', 9)));
        let input = Input::new("\\subset", false);
        assert_eq!(input.glyph(0), Some(('⊂', 7)));
    }

    #[test]
    fn test_ascii_operators() {
        let input = Input::new("<<< <-> <= V @U", true);
        assert_eq!(input.operator_at(0), Some((BinaryOp::ProperSubset, 3)));
        assert_eq!(input.operator_at(4), Some((BinaryOp::Iff, 7)));
        assert_eq!(input.operator_at(8), Some((BinaryOp::LessEq, 10)));
        assert_eq!(input.operator_at(11), Some((BinaryOp::Or, 12)));
        assert_eq!(input.operator_at(13), Some((BinaryOp::Union, 15)));
    }

    #[test]
    fn test_ascii_spellings_need_ascii_mode() {
        let input = Input::new("&", false);
        assert_eq!(input.operator_at(0), None);
        let input = Input::new("| = <", false);
        assert_eq!(input.operator_at(0), Some((BinaryOp::Or, 1)));
        assert_eq!(input.operator_at(2), Some((BinaryOp::Equal, 3)));
        assert_eq!(input.operator_at(4), Some((BinaryOp::Less, 5)));
    }

    #[test]
    fn test_ascii_binders() {
        let input = Input::new("Ax.P(x)", true);
        assert_eq!(input.binder_at(0), Some((BinderKind::ForAll, 1)));
        let input = Input::new("A", true);
        assert_eq!(input.binder_at(0), None);
        let input = Input::new("Ax", false);
        assert_eq!(input.binder_at(0), None);
        let input = Input::new("λx", false);
        assert_eq!(input.binder_at(0), Some((BinderKind::Lambda, 1)));
    }

    #[test]
    fn test_variable_v_is_not_or() {
        let input = Input::new("Vx", true);
        assert_eq!(input.operator_at(0), None);
    }

    #[test]
    fn test_identifier_start() {
        assert!(is_identifier_start_char('a'));
        assert!(is_identifier_start_char('7'));
        assert!(is_identifier_start_char('α'));
        assert!(is_identifier_start_char('∅'));
        assert!(!is_identifier_start_char('λ'));
        assert!(!is_identifier_start_char('('));
    }
}
