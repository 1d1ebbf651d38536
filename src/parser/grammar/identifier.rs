use crate::ast::{Expr, IdentKind, Identifier};
use crate::parser::combinators::{ParseResultSet, Parsed};
use crate::parser::error::ParseError;
use crate::parser::state::{Input, is_identifier_start_char};
use crate::types::{N, T, Type, TypeError, parse_type_prefix};

use super::Scope;
use super::atom::comma_list;

/// An identifier as written, before typing.
#[derive(Debug, Clone)]
pub struct Name {
    pub symbol: String,
    pub starred: bool,
    pub explicit: Option<Type>,
    pub start: usize,
    pub end: usize,
}

impl Name {
    pub fn is_numeral(&self) -> bool {
        self.symbol.chars().all(|c| c.is_ascii_digit())
    }
}

fn continues_identifier(c: char) -> bool {
    (c.is_alphabetic() && c != 'λ' && c != 'ι') || c.is_ascii_digit() || c == '\''
}

/// Read an identifier: a run of digits, `∅`, or a letter followed by letters,
/// digits, primes and inner hyphens (only primes and digits in single-letter
/// mode). A trailing `*` marks it starred and `_type` gives its type.
pub fn read_name(input: &Input, pos: usize, scope: &Scope) -> Result<Option<Name>, ParseError> {
    let Some((first, mut end)) = input.glyph(pos) else {
        return Ok(None);
    };
    if !is_identifier_start_char(first) {
        return Ok(None);
    }
    if input.binder_at(pos).is_some() {
        return Err(ParseError::syntax(
            "a binder cannot stand here; put it in brackets",
            pos,
        ));
    }

    let mut symbol = String::from(first);
    if first.is_ascii_digit() {
        while let Some(c) = input.at(end).filter(char::is_ascii_digit) {
            symbol.push(c);
            end += 1;
        }
    } else if first != '∅' {
        loop {
            match input.glyph(end) {
                Some((c, after)) if scope.single_letter && (c == '\'' || c.is_ascii_digit()) => {
                    symbol.push(c);
                    end = after;
                }
                Some((c, after)) if !scope.single_letter && continues_identifier(c) => {
                    symbol.push(c);
                    end = after;
                }
                Some(('-', after))
                    if !scope.single_letter
                        && input
                            .glyph(after)
                            .is_some_and(|(c, _)| c.is_alphanumeric() && c != 'λ' && c != 'ι') =>
                {
                    symbol.push('-');
                    end = after;
                }
                _ => break,
            }
        }
    }

    // in ASCII input a spaced `*` is multiplication
    let mut starred = false;
    if input.at(end) == Some('*') {
        let following = input.at(end + 1);
        let operand_follows = following.is_some_and(is_identifier_start_char);
        let spaced = following.is_some_and(char::is_whitespace);
        if !operand_follows && !(input.is_ascii() && spaced) {
            starred = true;
            end += 1;
        }
    }

    let mut explicit = None;
    if input.at(end) == Some('_') {
        let (ty, after) = parse_type_prefix(input.chars(), end + 1)?;
        explicit = Some(ty);
        end = after;
    }

    Ok(Some(Name {
        symbol,
        starred,
        explicit,
        start: pos,
        end,
    }))
}

/// The identifier, typed, for a name that is not applied to anything.
fn resolve(name: &Name, scope: &Scope) -> Result<Identifier, ParseError> {
    let rule = scope.typer.lookup(&name.symbol);
    let (kind, ty) = match (&name.explicit, rule) {
        (Some(ty), Some(rule)) => (kind_of(rule.is_variable), ty.clone()),
        (Some(ty), None) => (IdentKind::Const, ty.clone()),
        (None, Some(rule)) => (kind_of(rule.is_variable), rule.ty.clone()),
        (None, None) if name.is_numeral() => (IdentKind::Const, N),
        (None, None) if name.symbol == "∅" => (IdentKind::Const, Type::set_of(crate::types::E)),
        (None, None) => return Err(ParseError::unknown_type(&name.symbol, name.start)),
    };
    Ok(build(name, kind, ty))
}

/// The identifier heading a predicate applied to an argument of type
/// `argument`; an unknown predicate is a constant of type `<argument,t>`.
fn resolve_predicate(name: &Name, scope: &Scope, argument: Result<Type, TypeError>) -> Result<Identifier, ParseError> {
    if name.explicit.is_some() || scope.typer.lookup(&name.symbol).is_some() || name.symbol == "∅" {
        return resolve(name, scope);
    }
    match argument {
        Ok(ty) => Ok(build(name, IdentKind::Const, Type::composite(ty, T))),
        Err(_) => Err(ParseError::unknown_type(&name.symbol, name.start)),
    }
}

fn kind_of(is_variable: bool) -> IdentKind {
    if is_variable {
        IdentKind::Var
    } else {
        IdentKind::Const
    }
}

fn build(name: &Name, kind: IdentKind, ty: Type) -> Identifier {
    let mut ident = Identifier::new(kind, name.symbol.clone(), ty);
    ident.explicit_type = name.explicit.is_some();
    ident.starred = name.starred;
    ident
}

/// identifier := name
///             | name "(" list ")"
///             | name name+          (single-letter mode)
pub fn identifier_or_predicate(input: &Input, pos: usize, scope: &Scope) -> ParseResultSet<Expr> {
    let Some(name) = read_name(input, pos, scope)? else {
        return Err(ParseError::syntax("expected an identifier", pos));
    };

    if !name.is_numeral() {
        if let Some(('(', after)) = input.glyph(name.end) {
            return predicate(input, &name, after, scope);
        }
        if scope.single_letter && is_function_like(&name, scope) && input.is_identifier_start(name.end) {
            return single_letter_predicate(input, &name, scope);
        }
    }

    let ident = resolve(&name, scope)?;
    Ok(vec![Parsed::new(Expr::Ident(ident), name.end)])
}

/// `P(a)` and `R(a,b)`.
fn predicate(input: &Input, name: &Name, after: usize, scope: &Scope) -> ParseResultSet<Expr> {
    if let Some((')', _)) = input.glyph(input.skip_whitespace(after)) {
        return Err(ParseError::syntax(
            format!("{} is applied to nothing", name.symbol),
            after,
        ));
    }
    let lists = comma_list(input, after, &scope.bracketed(), ')')?;

    let mut results = Vec::new();
    for list in lists {
        let mut values = list.value;
        let argument = if values.len() == 1 {
            values.remove(0)
        } else {
            Expr::ArgList(values)
        };
        let function = resolve_predicate(name, scope, argument.get_type())?;
        results.push(Parsed {
            value: Expr::app(Expr::Ident(function), argument),
            next: list.next,
            how_to_continue: list.how_to_continue,
        });
    }
    Ok(results)
}

/// Whether a name would take the letters after it as arguments.
fn is_function_like(name: &Name, scope: &Scope) -> bool {
    let ty = name
        .explicit
        .as_ref()
        .or_else(|| scope.typer.type_of(&name.symbol));
    match ty {
        Some(ty) => matches!(ty, Type::Composite(..)),
        None => true,
    }
}

/// `Pxy` in single-letter mode: every directly following identifier is an
/// argument.
fn single_letter_predicate(input: &Input, name: &Name, scope: &Scope) -> ParseResultSet<Expr> {
    let mut arguments = Vec::new();
    let mut end = name.end;
    while input.is_identifier_start(end) && input.binder_at(end).is_none() {
        let Some(arg) = read_name(input, end, scope)? else {
            break;
        };
        if arg.is_numeral() {
            break;
        }
        arguments.push(Expr::Ident(resolve(&arg, scope)?));
        end = arg.end;
    }

    let argument = if arguments.len() == 1 {
        arguments.remove(0)
    } else {
        Expr::ArgList(arguments)
    };
    let function = resolve_predicate(name, scope, argument.get_type())?;
    Ok(vec![Parsed::new(Expr::app(Expr::Ident(function), argument), end)])
}
