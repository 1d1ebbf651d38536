use crate::ast::{Binder, BinderKind, Expr, Identifier};
use crate::parser::combinators::{Farthest, ParseResultSet, Parsed, longest};
use crate::parser::error::ParseError;
use crate::parser::state::Input;

use super::Scope;
use super::atom::{atom, starts_argument};
use super::identifier::read_name;
use super::infix::expression;

/// prefix := "¬" prefix | binder | application
pub fn prefix(input: &Input, pos: usize, scope: &Scope) -> ParseResultSet<Expr> {
    if let Some(next) = input.negation_at(pos) {
        let inner = prefix(input, input.skip_whitespace(next), scope)?;
        return Ok(inner.into_iter().map(|p| p.map(Expr::not)).collect());
    }
    if let Some((kind, next)) = input.binder_at(pos) {
        return binder(input, pos, kind, next, scope);
    }
    application(input, pos, scope)
}

/// binder := ("∀" | "∃" | "λ" | "ι") identifier "."? expression
///
/// The body is the longest expression that can follow.
fn binder(
    input: &Input,
    pos: usize,
    kind: BinderKind,
    next: usize,
    scope: &Scope,
) -> ParseResultSet<Expr> {
    let var_pos = input.skip_whitespace(next);
    let Some(name) = read_name(input, var_pos, scope)? else {
        return Err(ParseError::syntax(
            format!("expected a variable after {}", kind.symbol()),
            var_pos,
        ));
    };
    if name.is_numeral() || name.symbol == "∅" {
        return Err(ParseError::syntax(
            format!("{} cannot be used as a variable", name.symbol),
            var_pos,
        ));
    }

    let ty = match &name.explicit {
        Some(ty) => ty.clone(),
        None => scope
            .typer
            .type_of(&name.symbol)
            .cloned()
            .ok_or_else(|| ParseError::unknown_type(&name.symbol, var_pos))?,
    };
    let mut var = Identifier::var(name.symbol.clone(), ty);
    var.explicit_type = name.explicit.is_some();
    var.starred = name.starred;

    let (has_period, after_var) = match input.glyph(name.end) {
        Some(('.', after)) => (true, after),
        _ => (false, name.end),
    };

    let body_pos = input.skip_whitespace(after_var);
    let bodies = expression(input, body_pos, &scope.enter_binder(&var)).map_err(|err| {
        if body_pos >= input.len() {
            ParseError::syntax(format!("the {} at position {} has no body", kind.symbol(), pos), body_pos)
        } else {
            err
        }
    })?;

    Ok(longest(bodies)
        .into_iter()
        .map(|body| {
            body.map(|inner| {
                Expr::Binder(Binder {
                    kind,
                    var: var.clone(),
                    inner: Box::new(inner),
                    has_period,
                })
            })
        })
        .collect())
}

/// application := atom atom*
///
/// Juxtaposition groups to the left. Outside binder bodies the atoms may be
/// separated by whitespace.
pub fn application(input: &Input, pos: usize, scope: &Scope) -> ParseResultSet<Expr> {
    let heads = atom(input, pos, scope)?;
    let mut out = Vec::new();
    for head in heads {
        extend(input, scope, head, &mut out);
    }
    Ok(out)
}

fn extend(input: &Input, scope: &Scope, function: Parsed<Expr>, out: &mut Vec<Parsed<Expr>>) {
    let mut farthest = Farthest::new();
    farthest.record_hint(&function);

    let arg_pos = if scope.in_binder {
        function.next
    } else {
        input.skip_whitespace(function.next)
    };
    if starts_argument(input, arg_pos) {
        match atom(input, arg_pos, scope) {
            Ok(arguments) => {
                for argument in arguments {
                    let applied = Parsed {
                        value: Expr::app(function.value.clone(), argument.value),
                        next: argument.next,
                        how_to_continue: argument.how_to_continue,
                    };
                    extend(input, scope, applied, out);
                }
            }
            Err(err) => farthest.record(err),
        }
    }

    out.push(Parsed {
        value: function.value,
        next: function.next,
        how_to_continue: farthest.take(),
    });
}
