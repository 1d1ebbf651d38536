use crate::ast::{Bracket, Expr, UnaryOp};
use crate::parser::combinators::{ParseResultSet, Parsed, and_then};
use crate::parser::error::ParseError;
use crate::parser::state::{Input, is_identifier_start_char};
use crate::types::{E, parse_type_prefix};

use super::Scope;
use super::identifier::identifier_or_predicate;
use super::infix::expression;

/// atom := "(" list ")" | "[" expression "]" | "|" expression "|" | set
///       | "g(" digits ")" type? | identifier
pub fn atom(input: &Input, pos: usize, scope: &Scope) -> ParseResultSet<Expr> {
    let Some((c, next)) = input.glyph(pos) else {
        return Err(ParseError::syntax(
            "the input ends where an expression should follow",
            pos,
        ));
    };
    match c {
        '(' => round(input, pos, next, scope),
        '[' => square(input, pos, next, scope),
        '|' => cardinality(input, pos, next, scope),
        '{' => set(input, pos, next, scope),
        'g' if input.at(next) == Some('(') && input.at(next + 1).is_some_and(|d| d.is_ascii_digit()) => {
            gapp(input, next + 1)
        }
        c if is_identifier_start_char(c) => identifier_or_predicate(input, pos, scope),
        c => Err(ParseError::bad_character(c, "expected an expression here", pos)),
    }
}

/// Whether an argument atom can start at `pos` when the preceding atom is a
/// function. An operator spelling always wins, so `|` here is disjunction.
pub fn starts_argument(input: &Input, pos: usize) -> bool {
    if input.operator_at(pos).is_some() || input.binder_at(pos).is_some() {
        return false;
    }
    match input.glyph(pos) {
        Some(('(' | '[' | '{', _)) => true,
        Some((c, _)) => is_identifier_start_char(c),
        None => false,
    }
}

/// list := expression ("," expression)* close
///
/// `pos` is just after the opening bracket.
pub fn comma_list(input: &Input, pos: usize, scope: &Scope, close: char) -> ParseResultSet<Vec<Expr>> {
    let start = input.skip_whitespace(pos);
    let items = expression(input, start, scope)?;
    and_then(
        items,
        |item| {
            let at = input.skip_whitespace(item.next);
            match input.glyph(at) {
                Some((',', after)) => {
                    let rest = comma_list(input, after, scope, close)?;
                    Ok(rest
                        .into_iter()
                        .map(|tail| {
                            tail.map(|mut values| {
                                values.insert(0, item.value.clone());
                                values
                            })
                        })
                        .collect())
                }
                Some((c, after)) if c == close => Ok(vec![Parsed::new(vec![item.value], after)]),
                _ => Err(closing_error(input, at, close)),
            }
        },
        || closing_error(input, start, close),
    )
}

fn closing_error(input: &Input, at: usize, close: char) -> ParseError {
    match input.at(at) {
        Some(found) => ParseError::bad_character(found, format!("expected ',' or '{}'", close), at),
        None => ParseError::syntax(format!("missing '{}' at the end", close), at),
    }
}

/// `( a )` is a bracketed expression, `(a, b)` an argument list.
fn round(input: &Input, open: usize, next: usize, scope: &Scope) -> ParseResultSet<Expr> {
    let lists = comma_list(input, next, &scope.bracketed(), ')').map_err(|err| unclosed(err, input, open, ')'))?;
    Ok(lists
        .into_iter()
        .map(|list| {
            list.map(|mut values| {
                if values.len() == 1 {
                    Expr::unary(UnaryOp::Parens(Bracket::Round), values.remove(0))
                } else {
                    Expr::ArgList(values)
                }
            })
        })
        .collect())
}

fn square(input: &Input, open: usize, next: usize, scope: &Scope) -> ParseResultSet<Expr> {
    enclosed(input, open, next, scope, ']', |inner| {
        Expr::unary(UnaryOp::Parens(Bracket::Square), inner)
    })
}

fn cardinality(input: &Input, open: usize, next: usize, scope: &Scope) -> ParseResultSet<Expr> {
    enclosed(input, open, next, scope, '|', |inner| {
        Expr::unary(UnaryOp::Cardinality, inner)
    })
}

/// One expression followed by `close`.
fn enclosed(
    input: &Input,
    open: usize,
    next: usize,
    scope: &Scope,
    close: char,
    build: impl Fn(Expr) -> Expr,
) -> ParseResultSet<Expr> {
    let start = input.skip_whitespace(next);
    let inner = expression(input, start, &scope.bracketed())?;
    and_then(
        inner,
        |candidate| {
            let at = input.skip_whitespace(candidate.next);
            match input.glyph(at) {
                Some((c, after)) if c == close => Ok(vec![Parsed::new(build(candidate.value), after)]),
                _ => Err(ParseError::syntax(format!("expected '{}'", close), at)),
            }
        },
        || ParseError::syntax(format!("expected '{}'", close), start),
    )
    .map_err(|err| unclosed(err, input, open, close))
}

/// Errors that ran into the end of the input become "unclosed bracket".
fn unclosed(err: ParseError, input: &Input, open: usize, close: char) -> ParseError {
    match err.position() {
        Some(at) if at >= input.len() => ParseError::syntax(
            format!("the bracket at position {} is never closed with '{}'", open, close),
            at,
        ),
        _ => err,
    }
}

/// set := "{" list "}" | "{" expression "|" expression "}"
fn set(input: &Input, open: usize, next: usize, scope: &Scope) -> ParseResultSet<Expr> {
    let start = input.skip_whitespace(next);
    if let Some(('}', _)) = input.glyph(start) {
        return Err(ParseError::syntax(
            "empty braces; write ∅ for the empty set",
            open,
        ));
    }

    let scope = scope.bracketed();
    let firsts = expression(input, start, &scope)?;
    and_then(
        firsts,
        |first| {
            let at = input.skip_whitespace(first.next);
            match input.glyph(at) {
                Some(('|', after)) => generator(input, first.value, after, &scope),
                Some((',', after)) => {
                    let rest = comma_list(input, after, &scope, '}')?;
                    Ok(rest
                        .into_iter()
                        .map(|tail| {
                            tail.map(|mut values| {
                                values.insert(0, first.value.clone());
                                Expr::SetWithElements(values)
                            })
                        })
                        .collect())
                }
                Some(('}', after)) => Ok(vec![Parsed::new(Expr::SetWithElements(vec![first.value]), after)]),
                _ => Err(ParseError::syntax("expected ',', '|' or '}'", at)),
            }
        },
        || ParseError::syntax("expected '}'", start),
    )
    .map_err(|err| unclosed(err, input, open, '}'))
}

/// The filter of `{template | filter}`; the template's variables keep their
/// types inside the filter.
fn generator(input: &Input, template: Expr, pos: usize, scope: &Scope) -> ParseResultSet<Expr> {
    let mut inner = scope.clone();
    for var in template.free_variables() {
        inner.typer.add_exact(var.symbol.clone(), true, var.ty.clone());
    }
    let start = input.skip_whitespace(pos);
    let filters = expression(input, start, &inner)?;
    and_then(
        filters,
        |filter| {
            let at = input.skip_whitespace(filter.next);
            match input.glyph(at) {
                Some(('}', after)) => Ok(vec![Parsed::new(
                    Expr::generator(template.clone(), filter.value),
                    after,
                )]),
                _ => Err(ParseError::syntax("expected '}'", at)),
            }
        },
        || ParseError::syntax("expected '}'", start),
    )
}

/// `g(N)`, optionally followed by `_type`; `pos` is just after the `(`.
fn gapp(input: &Input, pos: usize) -> ParseResultSet<Expr> {
    let mut end = pos;
    while input.at(end).is_some_and(|c| c.is_ascii_digit()) {
        end += 1;
    }
    if input.at(end) != Some(')') {
        return Err(ParseError::syntax("expected ')' after the index of g", end));
    }
    let digits: String = input.chars()[pos..end].iter().collect();
    let index = digits
        .parse::<u32>()
        .map_err(|_| ParseError::syntax(format!("{} is too large for an index", digits), pos))?;

    let mut next = end + 1;
    let mut ty = E;
    if input.at(next) == Some('_') {
        let (explicit, after) = parse_type_prefix(input.chars(), next + 1)?;
        ty = explicit;
        next = after;
    }
    Ok(vec![Parsed::new(Expr::GApp { index, ty }, next)])
}
