//! # Lambda Conversion
//!
//! Beta reduction over immutable trees, one redex per step.
//!
//! A step finds the first redex (top-down, function before argument) and
//! substitutes the argument for the lambda's variable. When a binder inside
//! the body would capture a free variable of the argument, the substitution is
//! redone on an alphabetic variant of the whole expression, in which the
//! capturing binders use fresh primed variables. Both the variant and the
//! uncorrected result are reported so that callers can show the detour.
//!
//! A lambda whose variable has a polymorphic type is first specialised to the
//! argument's type (its alphatypical variant).

mod substitute;
mod variant;

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::ast::{BinaryOp, BinderKind, Expr};
use crate::types::align_types;

pub use substitute::{Substitution, rename_free};
pub use variant::{alphabetic_variant, alphatypical_variant};

/// The outcome of one reduction step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaConversion {
    pub result: Expr,
    /// The input with its capturing binders renamed, if capture had to be
    /// avoided. It is alpha-equivalent to the input.
    pub alphabetic_variant: Option<Expr>,
    /// What naive substitution would have produced.
    pub uncorrected_result: Option<Expr>,
}

struct Conversion {
    result: Expr,
    /// Whether the substitution that produced `result` captured a variable.
    captures: bool,
    /// The capturing binding sites, as they occur in the unspecialised input.
    accidental: Vec<Expr>,
}

impl Expr {
    /// Reduce the first redex, or `None` if there is none.
    pub fn perform_lambda_conversion(&self) -> Option<LambdaConversion> {
        let mut taken = self.variable_symbols();
        let first = convert(self, &mut taken)?;

        if !first.captures {
            return Some(LambdaConversion {
                result: first.result,
                alphabetic_variant: None,
                uncorrected_result: None,
            });
        }

        debug!(
            "{} binding site(s) would capture a variable, renaming",
            first.accidental.len()
        );
        let variant = alphabetic_variant(self, &first.accidental, &mut taken);
        let Some(second) = convert(&variant, &mut taken) else {
            panic!("alphabetic variant {variant} lost its redex");
        };
        if second.captures {
            panic!("alphabetic variant {variant} still captures a variable");
        }

        Some(LambdaConversion {
            result: second.result,
            alphabetic_variant: Some(variant),
            uncorrected_result: Some(first.result),
        })
    }

    /// Reduce until no redex is left. Terms without a normal form do not
    /// terminate.
    pub fn simplify_fully(&self) -> Expr {
        let mut current = self.clone();
        while let Some(step) = current.perform_lambda_conversion() {
            debug!("{current} => {}", step.result);
            current = step.result;
        }
        current
    }
}

fn convert(expr: &Expr, taken: &mut BTreeSet<String>) -> Option<Conversion> {
    if let Expr::Binary {
        op: BinaryOp::FunApp,
        left,
        right,
    } = expr
    {
        let is_lambda = left
            .strip_parens()
            .as_binder()
            .is_some_and(|binder| binder.kind == BinderKind::Lambda);
        if is_lambda {
            return Some(reduce_redex(left, right, taken));
        }
    }

    for (index, child) in expr.children().into_iter().enumerate() {
        if let Some(inner) = convert(child, taken) {
            return Some(Conversion {
                result: expr.replace_child(index, inner.result),
                ..inner
            });
        }
    }
    None
}

fn reduce_redex(function: &Expr, argument: &Expr, taken: &mut BTreeSet<String>) -> Conversion {
    let argument = argument.strip_parens();
    let lambda = function.strip_parens();
    let Expr::Binder(binder) = lambda else {
        unreachable!("a redex applies a lambda");
    };

    // Sites are collected on the unspecialised lambda so that they can be
    // found again in the input.
    let mut substitution = Substitution::new(&binder.var, argument);
    let result = substitution.apply(&binder.inner);
    let accidental = substitution.accidental;

    let Some(specialised) = specialise(lambda, argument, taken) else {
        return Conversion {
            result,
            captures: !accidental.is_empty(),
            accidental,
        };
    };
    let Expr::Binder(binder) = &specialised else {
        unreachable!("the alphatypical variant of a lambda is a lambda");
    };
    let mut substitution = Substitution::new(&binder.var, argument);
    let result = substitution.apply(&binder.inner);
    Conversion {
        result,
        captures: !substitution.accidental.is_empty(),
        accidental,
    }
}

/// The alphatypical variant of a polymorphic lambda for `argument`, if the
/// types align to something non-trivial.
fn specialise(lambda: &Expr, argument: &Expr, taken: &mut BTreeSet<String>) -> Option<Expr> {
    let binder = lambda.as_binder()?;
    if !binder.var.ty.contains_type_vars() {
        return None;
    }
    let actual = argument.get_type().ok()?;
    match align_types(&binder.var.ty, &actual) {
        Ok(subst) if !subst.is_empty() => {
            debug!("specialising {} with {}", binder.var.symbol, subst);
            Some(alphatypical_variant(lambda, &subst, taken))
        }
        Ok(_) => None,
        Err(err) => {
            debug!("not specialising {}: {}", binder.var.symbol, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Identifier;
    use crate::types::{E, T, Type};

    fn var(s: &str) -> Identifier {
        Identifier::var(s, E)
    }

    fn p(arg: Expr) -> Expr {
        Expr::app(Expr::constant("P", Type::set_of(E)), arg)
    }

    fn r(a: Expr, b: Expr) -> Expr {
        Expr::app(
            Expr::constant("R", Type::set_of(Type::product(vec![E, E]))),
            Expr::ArgList(vec![a, b]),
        )
    }

    #[test]
    fn test_simple_redex() {
        let redex = Expr::app(
            Expr::parens(Expr::lambda(var("x"), p(Expr::Ident(var("x"))))),
            Expr::constant("a", E),
        );
        let step = redex.perform_lambda_conversion().unwrap();
        assert_eq!(step.result, p(Expr::constant("a", E)));
        assert_eq!(step.alphabetic_variant, None);
        assert_eq!(step.uncorrected_result, None);
    }

    #[test]
    fn test_no_redex() {
        assert!(p(Expr::constant("a", E)).perform_lambda_conversion().is_none());
        let lambda = Expr::lambda(var("x"), p(Expr::Ident(var("x"))));
        assert!(lambda.perform_lambda_conversion().is_none());
    }

    #[test]
    fn test_capture_is_avoided() {
        // [λx.λy.R(x,y)](y)
        let redex = Expr::app(
            Expr::lambda(
                var("x"),
                Expr::lambda(var("y"), r(Expr::Ident(var("x")), Expr::Ident(var("y")))),
            ),
            Expr::Ident(var("y")),
        );
        let step = redex.perform_lambda_conversion().unwrap();

        let expected = Expr::lambda(var("y'"), r(Expr::Ident(var("y")), Expr::Ident(var("y'"))));
        assert_eq!(step.result, expected);
        assert_eq!(
            step.uncorrected_result,
            Some(Expr::lambda(var("y"), r(Expr::Ident(var("y")), Expr::Ident(var("y")))))
        );
        let variant = step.alphabetic_variant.unwrap();
        assert!(variant.alpha_equivalent(&redex));
        assert_ne!(variant, redex);
    }

    #[test]
    fn test_leftmost_outermost_first() {
        let inner = Expr::app(
            Expr::lambda(var("y"), p(Expr::Ident(var("y")))),
            Expr::constant("b", E),
        );
        let outer = Expr::app(
            Expr::lambda(var("x"), Expr::binary(BinaryOp::And, p(Expr::Ident(var("x"))), inner.clone())),
            Expr::constant("a", E),
        );
        let step = outer.perform_lambda_conversion().unwrap();
        assert_eq!(
            step.result,
            Expr::binary(BinaryOp::And, p(Expr::constant("a", E)), inner)
        );
    }

    #[test]
    fn test_redex_below_the_top() {
        let redex = Expr::app(
            Expr::lambda(var("x"), p(Expr::Ident(var("x")))),
            Expr::constant("a", E),
        );
        let expr = Expr::not(redex);
        let step = expr.perform_lambda_conversion().unwrap();
        assert_eq!(step.result, Expr::not(p(Expr::constant("a", E))));
    }

    #[test]
    fn test_simplify_fully() {
        // [λf.f(a)](λx.P(x))
        let f = Identifier::var("f", Type::set_of(E));
        let expr = Expr::app(
            Expr::lambda(f.clone(), Expr::app(Expr::Ident(f), Expr::constant("a", E))),
            Expr::lambda(var("x"), p(Expr::Ident(var("x")))),
        );
        let simplified = expr.simplify_fully();
        assert_eq!(simplified, p(Expr::constant("a", E)));
        assert_eq!(simplified.simplify_fully(), simplified);
    }

    #[test]
    fn test_polymorphic_redex_is_specialised() {
        // [λx_'a.F(x)](a) with F: <'a,t>
        let x = Identifier::var("x", Type::var('a'));
        let f = Expr::constant("F", Type::composite(Type::var('a'), T));
        let redex = Expr::app(
            Expr::lambda(x.clone(), Expr::app(f, Expr::Ident(x))),
            Expr::constant("a", E),
        );
        let step = redex.perform_lambda_conversion().unwrap();
        assert_eq!(
            step.result,
            Expr::app(Expr::constant("F", Type::set_of(E)), Expr::constant("a", E))
        );
        assert_eq!(step.result.get_type(), Ok(T));
    }

    #[test]
    fn test_polymorphic_capture_renames_in_the_input() {
        // (λx_'a.λy.[R(y,y) ∧ x = x])(y)
        let x = Identifier::var("x", Type::var('a'));
        let body = Expr::lambda(
            var("y"),
            Expr::binary(
                BinaryOp::And,
                r(Expr::Ident(var("y")), Expr::Ident(var("y"))),
                Expr::binary(BinaryOp::Equal, Expr::Ident(x.clone()), Expr::Ident(x.clone())),
            ),
        );
        let redex = Expr::app(Expr::parens(Expr::lambda(x.clone(), body)), Expr::Ident(var("y")));
        let step = redex.perform_lambda_conversion().unwrap();

        let variant = step.alphabetic_variant.unwrap();
        let renamed = Expr::lambda(
            var("y'"),
            Expr::binary(
                BinaryOp::And,
                r(Expr::Ident(var("y'")), Expr::Ident(var("y'"))),
                Expr::binary(BinaryOp::Equal, Expr::Ident(x.clone()), Expr::Ident(x.clone())),
            ),
        );
        assert_eq!(
            variant,
            Expr::app(Expr::parens(Expr::lambda(x, renamed)), Expr::Ident(var("y")))
        );
        assert!(variant.alpha_equivalent(&redex));
        assert!(matches!(
            &variant,
            Expr::Binary { left, .. } if matches!(left.as_ref(), Expr::Unary { .. })
        ));
    }
}
