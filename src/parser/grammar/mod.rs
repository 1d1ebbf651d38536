//! Grammar rules for expressions
//!
//! Rules are organised by level, loosest first:
//! - `infix`: operator chains grouped by precedence band
//! - `prefix`: negation, binders and application
//! - `atom`: brackets, sets, cardinality and `g(N)`
//! - `identifier`: identifiers and predicates with their arguments
//!
//! Every rule takes the input, a start position and the current [`Scope`], and
//! returns every way of reading a prefix of the remaining input.

mod atom;
mod identifier;
mod infix;
mod prefix;

use crate::ast::Identifier;
use crate::typer::IdentifierTyper;

pub use infix::expression;

/// What the rules need to know about their surroundings.
///
/// Entering a binder clones the scope, so a bound variable's typing rule never
/// leaks past the binder's body.
#[derive(Debug, Clone)]
pub struct Scope {
    pub typer: IdentifierTyper,
    pub single_letter: bool,
    /// Inside a binder body, application requires adjacency.
    pub in_binder: bool,
}

impl Scope {
    pub fn new(typer: IdentifierTyper, single_letter: bool) -> Self {
        Scope {
            typer,
            single_letter,
            in_binder: false,
        }
    }

    /// The scope of a binder body: `var` is a variable of its type from here on.
    pub fn enter_binder(&self, var: &Identifier) -> Self {
        let mut inner = self.clone();
        inner.typer.add_exact(var.symbol.clone(), true, var.ty.clone());
        inner.in_binder = true;
        inner
    }

    /// The scope inside brackets, where whitespace application is allowed again.
    pub fn bracketed(&self) -> Self {
        Scope {
            in_binder: false,
            ..self.clone()
        }
    }
}

