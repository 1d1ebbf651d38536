use thiserror::Error;

use crate::types::TypeError;

/// Errors surfaced by the expression and type parsers.
///
/// Positions are character offsets into the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed input at the grammar level.
    #[error("{message} (at position {position})")]
    Syntax { message: String, position: usize },

    /// A character that cannot start or continue anything at this point.
    #[error("unexpected character '{found}' at position {position}: {message}")]
    BadCharacter {
        found: char,
        message: String,
        position: usize,
    },

    /// More than one complete, well-typed reading survived.
    #[error("{message} (at position {position}); possible readings: {}", .alternatives.join(" | "))]
    Ambiguous {
        message: String,
        position: usize,
        alternatives: Vec<String>,
    },

    /// No typing convention covers an identifier and its type cannot be inferred.
    #[error(
        "don't know the type of '{identifier}' (at position {position}); give it an explicit type, for instance {identifier}_e or {identifier}_<e,t>"
    )]
    IdentifierTypeUnknown { identifier: String, position: usize },

    /// Every complete reading is ill-typed.
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        ParseError::Syntax {
            message: message.into(),
            position,
        }
    }

    pub fn bad_character(found: char, message: impl Into<String>, position: usize) -> Self {
        ParseError::BadCharacter {
            found,
            message: message.into(),
            position,
        }
    }

    pub fn unknown_type(identifier: impl Into<String>, position: usize) -> Self {
        ParseError::IdentifierTypeUnknown {
            identifier: identifier.into(),
            position,
        }
    }

    /// The offending position, when the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { position, .. }
            | ParseError::BadCharacter { position, .. }
            | ParseError::Ambiguous { position, .. }
            | ParseError::IdentifierTypeUnknown { position, .. } => Some(*position),
            ParseError::Type(_) => None,
        }
    }

    /// Syntax errors proper: plain, bad-character and ambiguity errors.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            ParseError::Syntax { .. } | ParseError::BadCharacter { .. } | ParseError::Ambiguous { .. }
        )
    }

    /// Of two competing explanations, keep the one that got further.
    pub fn furthest(self, other: ParseError) -> ParseError {
        match (self.position(), other.position()) {
            (Some(a), Some(b)) if b > a => other,
            (None, Some(_)) => other,
            _ => self,
        }
    }
}
