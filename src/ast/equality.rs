//! The three equality modes.
//!
//! All of them are the same walk over two trees; brackets are transparent in
//! every mode.
//!
//! - literal: identifiers must be identical
//! - alpha: bound variables may differ as long as they are renamed consistently
//! - operator: identifiers are ignored altogether, only the shape and the
//!   operators count

use super::expression::{Expr, Identifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Literal,
    Alpha,
    Operator,
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        equivalent(self, other, Mode::Literal, &mut Vec::new())
    }
}

impl Eq for Expr {}

impl Expr {
    /// Equal up to a consistent renaming of bound variables.
    pub fn alpha_equivalent(&self, other: &Expr) -> bool {
        equivalent(self, other, Mode::Alpha, &mut Vec::new())
    }

    /// Equal up to the identity of every identifier.
    pub fn operator_equivalent(&self, other: &Expr) -> bool {
        equivalent(self, other, Mode::Operator, &mut Vec::new())
    }
}

/// `pairs` holds the bound variables in scope on each side, innermost last.
fn equivalent(a: &Expr, b: &Expr, mode: Mode, pairs: &mut Vec<(Identifier, Identifier)>) -> bool {
    let (a, b) = (a.strip_parens(), b.strip_parens());
    match (a, b) {
        (Expr::Ident(x), Expr::Ident(y)) => match mode {
            Mode::Operator => true,
            Mode::Literal => x == y,
            Mode::Alpha => {
                let left = pairs.iter().rev().find(|(l, _)| l == x);
                let right = pairs.iter().rev().find(|(_, r)| r == y);
                match (left, right) {
                    (None, None) => x == y,
                    (Some(pl), Some(pr)) => std::ptr::eq(pl, pr),
                    _ => false,
                }
            }
        },

        (Expr::Binder(x), Expr::Binder(y)) => {
            if x.kind != y.kind {
                return false;
            }
            match mode {
                Mode::Literal if x.var != y.var => false,
                Mode::Alpha if x.var.ty != y.var.ty => false,
                _ => {
                    pairs.push((x.var.clone(), y.var.clone()));
                    let result = equivalent(&x.inner, &y.inner, mode, pairs);
                    pairs.pop();
                    result
                }
            }
        }

        (
            Expr::Binary {
                op: op_a,
                left: left_a,
                right: right_a,
            },
            Expr::Binary {
                op: op_b,
                left: left_b,
                right: right_b,
            },
        ) => {
            op_a == op_b
                && equivalent(left_a, left_b, mode, pairs)
                && equivalent(right_a, right_b, mode, pairs)
        }

        (Expr::Unary { op: op_a, inner: a }, Expr::Unary { op: op_b, inner: b }) => {
            op_a == op_b && equivalent(a, b, mode, pairs)
        }

        (Expr::ArgList(xs), Expr::ArgList(ys))
        | (Expr::SetWithElements(xs), Expr::SetWithElements(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| equivalent(x, y, mode, pairs))
        }

        (
            Expr::SetWithGenerator {
                template: template_a,
                filter: filter_a,
            },
            Expr::SetWithGenerator {
                template: template_b,
                filter: filter_b,
            },
        ) => {
            let introduced_a = template_a.free_variables();
            let introduced_b = template_b.free_variables();
            if mode == Mode::Alpha && introduced_a.len() != introduced_b.len() {
                return false;
            }
            let depth = pairs.len();
            if mode == Mode::Alpha {
                pairs.extend(introduced_a.into_iter().zip(introduced_b));
            }
            let result = equivalent(template_a, template_b, mode, pairs)
                && equivalent(filter_a, filter_b, mode, pairs);
            pairs.truncate(depth);
            result
        }

        (Expr::GApp { index: i, ty: s }, Expr::GApp { index: j, ty: t }) => {
            mode == Mode::Operator || (i == j && s == t)
        }

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::expression::{BinaryOp, BinderKind, Expr, Identifier};
    use crate::types::{E, T, Type};

    fn var(s: &str) -> Identifier {
        Identifier::var(s, E)
    }

    fn p(arg: Expr) -> Expr {
        Expr::app(Expr::constant("P", Type::set_of(E)), arg)
    }

    fn lam(v: &str, body: Expr) -> Expr {
        Expr::lambda(var(v), body)
    }

    #[test]
    fn test_renamed_lambdas_are_alpha_equivalent_only() {
        let a = lam("x", p(Expr::Ident(var("x"))));
        let b = lam("y", p(Expr::Ident(var("y"))));
        assert_ne!(a, b);
        assert!(a.alpha_equivalent(&b));
    }

    #[test]
    fn test_parens_are_transparent() {
        let a = p(Expr::constant("a", E));
        assert_eq!(Expr::parens(a.clone()), a);
    }

    #[test]
    fn test_explicit_type_flag_is_ignored() {
        use std::collections::HashSet;

        let written = var("x").with_explicit_type();
        assert_eq!(written, var("x"));
        assert_eq!(HashSet::from([written, var("x")]).len(), 1);
        assert_ne!(var("x").starred(), var("x"));
    }

    #[test]
    fn test_free_variables_must_agree() {
        let a = lam("x", p(Expr::Ident(var("z"))));
        let b = lam("y", p(Expr::Ident(var("w"))));
        assert!(!a.alpha_equivalent(&b));
        assert!(a.operator_equivalent(&b));
    }

    #[test]
    fn test_bound_cannot_match_free() {
        // λx.R(x,y) vs λy.R(y,y)
        let r = |a: Expr, b: Expr| {
            Expr::app(
                Expr::constant("R", Type::set_of(Type::product(vec![E, E]))),
                Expr::ArgList(vec![a, b]),
            )
        };
        let a = lam("x", r(Expr::Ident(var("x")), Expr::Ident(var("y"))));
        let b = lam("y", r(Expr::Ident(var("y")), Expr::Ident(var("y"))));
        assert!(!a.alpha_equivalent(&b));
    }

    #[test]
    fn test_nested_shadowing() {
        // λx.λx.P(x) ~ λy.λz.P(z), but not λy.λz.P(y)
        let a = lam("x", lam("x", p(Expr::Ident(var("x")))));
        let b = lam("y", lam("z", p(Expr::Ident(var("z")))));
        let c = lam("y", lam("z", p(Expr::Ident(var("y")))));
        assert!(a.alpha_equivalent(&b));
        assert!(!a.alpha_equivalent(&c));
    }

    #[test]
    fn test_binder_kinds_must_agree() {
        let a = Expr::binder(BinderKind::ForAll, var("x"), p(Expr::Ident(var("x"))));
        let b = Expr::binder(BinderKind::Exists, var("x"), p(Expr::Ident(var("x"))));
        assert!(!a.operator_equivalent(&b));
    }

    #[test]
    fn test_generators() {
        let a = Expr::generator(Expr::Ident(var("x")), p(Expr::Ident(var("x"))));
        let b = Expr::generator(Expr::Ident(var("y")), p(Expr::Ident(var("y"))));
        assert!(a.alpha_equivalent(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_operator_equivalence_sees_operators() {
        let t = |s: &str| Expr::constant(s, T);
        let a = Expr::binary(BinaryOp::And, t("p"), t("q"));
        let b = Expr::binary(BinaryOp::And, t("r"), t("s"));
        let c = Expr::binary(BinaryOp::Or, t("p"), t("q"));
        assert!(a.operator_equivalent(&b));
        assert!(!a.operator_equivalent(&c));
    }
}
