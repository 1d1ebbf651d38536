//! # Expression Parser
//!
//! A nondeterministic recursive-descent parser. Each grammar rule returns every
//! reading it can find (see [`combinators`]), and [`parse`] picks among the
//! readings that reach the end of the input:
//!
//! 1. only the readings that consumed the most input are kept,
//! 2. if any of them is well typed, the ill-typed ones are dropped,
//! 3. identical trees collapse; if distinct trees remain, the input is
//!    ambiguous and every reading is reported.
//!
//! When no reading reaches the end, the diagnostic attached to the reading
//! that got furthest is returned.

pub mod combinators;
mod error;
mod grammar;
mod state;

use std::collections::BTreeMap;

use log::debug;

use crate::ast::Expr;
use crate::typer::IdentifierTyper;
use crate::types::Type;

pub use error::ParseError;
pub use state::{Input, escape_name, is_identifier_start_char};

use grammar::Scope;

/// Settings for a parse, plus the explicit types found by the last one.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Accept keyboard spellings such as `Ax`, `&` and `->`.
    pub ascii: bool,
    /// Identifiers are one letter plus primes and digits, so `Pxy` is `P(x,y)`.
    pub single_letter_identifiers: bool,
    pub typer: IdentifierTyper,
    /// Every identifier given an explicit type in the chosen reading.
    pub explicit_types: BTreeMap<String, Type>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascii(mut self, ascii: bool) -> Self {
        self.ascii = ascii;
        self
    }

    pub fn single_letter_identifiers(mut self, single_letter: bool) -> Self {
        self.single_letter_identifiers = single_letter;
        self
    }

    pub fn typer(mut self, typer: IdentifierTyper) -> Self {
        self.typer = typer;
        self
    }
}

/// Parse `text` into a single expression tree.
pub fn parse(text: &str, options: &mut ParseOptions) -> Result<Expr, ParseError> {
    let input = Input::new(text, options.ascii);
    let scope = Scope::new(options.typer.clone(), options.single_letter_identifiers);

    let start = input.skip_whitespace(0);
    if start >= input.len() {
        return Err(ParseError::syntax("there is nothing to parse", start));
    }

    let candidates = grammar::expression(&input, start, &scope)?;
    debug!("{} candidate reading(s) of {:?}", candidates.len(), text);

    let (complete, partial): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|candidate| input.at_end(candidate.next));

    if complete.is_empty() {
        return Err(stuck(&input, partial));
    }
    let complete = combinators::longest(complete);

    let mut first_error = None;
    let mut typed = Vec::new();
    for candidate in complete {
        match candidate.value.get_type() {
            Ok(_) => typed.push(candidate.value),
            Err(err) => {
                debug!("dropping ill-typed reading {}: {}", candidate.value, err);
                first_error.get_or_insert(err);
            }
        }
    }
    if typed.is_empty() {
        if let Some(err) = first_error {
            return Err(ParseError::Type(err));
        }
    }

    let mut distinct: Vec<Expr> = Vec::new();
    for expr in typed {
        if !distinct.contains(&expr) {
            distinct.push(expr);
        }
    }

    if distinct.len() > 1 {
        return Err(ParseError::Ambiguous {
            message: "the expression can be read in more than one way; add brackets".into(),
            position: start,
            alternatives: distinct.iter().map(Expr::to_string).collect(),
        });
    }
    let Some(expr) = distinct.pop() else {
        unreachable!("at least one complete reading survives the filters");
    };

    options.explicit_types.clear();
    collect_explicit_types(&expr, &mut options.explicit_types);
    Ok(expr)
}

/// [`parse`], with errors discarded.
pub fn parse_or_none(text: &str, options: &mut ParseOptions) -> Option<Expr> {
    parse(text, options).ok()
}

/// The error to report when no reading reaches the end of the input.
fn stuck(input: &Input, partial: Vec<combinators::Parsed<Expr>>) -> ParseError {
    let Some(furthest) = partial.into_iter().max_by_key(|candidate| candidate.next) else {
        return ParseError::syntax("could not parse the input", 0);
    };
    if let Some(hint) = furthest.how_to_continue {
        return hint;
    }
    let at = input.skip_whitespace(furthest.next);
    match input.at(at) {
        Some(found) => ParseError::bad_character(found, "expected an operator or the end of the input", at),
        None => ParseError::syntax("unexpected end of input", at),
    }
}

fn collect_explicit_types(expr: &Expr, found: &mut BTreeMap<String, Type>) {
    match expr {
        Expr::Ident(ident) if ident.explicit_type => {
            found.insert(ident.symbol.clone(), ident.ty.clone());
        }
        Expr::Binder(binder) if binder.var.explicit_type => {
            found.insert(binder.var.symbol.clone(), binder.var.ty.clone());
        }
        _ => {}
    }
    for child in expr.children() {
        collect_explicit_types(child, found);
    }
}
