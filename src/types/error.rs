//! # Type Error Definitions
//!
//! Errors raised while computing the type of an expression or while aligning a
//! polymorphic type against a concrete one:
//!
//! - an operand has a type its operator cannot accept (`Mismatch`)
//! - a node cannot be typed at all (`Evaluation`)
//! - a type variable would have to stand for two different types, or the two
//!   types have incompatible shapes (`Alignment`)
//!
//! ## Related Modules
//!
//! - [`crate::ast::typing`] - type evaluation that produces these errors
//! - [`crate::types::align`] - alignment errors

use thiserror::Error;

use super::ty::Type;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A node whose type cannot be determined.
    #[error("{message}")]
    Evaluation { message: String },

    /// An operand whose type does not fit its operator.
    ///
    /// `expression` is the rendering of the offending subexpression.
    #[error("type mismatch in {expression}: {message}")]
    Mismatch { expression: String, message: String },

    /// Alignment of a polymorphic type failed.
    #[error("cannot align {formal} with {actual}: {reason}")]
    Alignment {
        formal: Type,
        actual: Type,
        reason: String,
    },
}

impl TypeError {
    pub fn evaluation(message: impl Into<String>) -> Self {
        TypeError::Evaluation {
            message: message.into(),
        }
    }

    pub fn mismatch(expression: impl Into<String>, message: impl Into<String>) -> Self {
        TypeError::Mismatch {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub fn alignment(formal: &Type, actual: &Type, reason: impl Into<String>) -> Self {
        TypeError::Alignment {
            formal: formal.clone(),
            actual: actual.clone(),
            reason: reason.into(),
        }
    }
}
