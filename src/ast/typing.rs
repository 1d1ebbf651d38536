//! # Type Evaluation
//!
//! Computes the semantic type of an expression bottom-up. There is no
//! inference here: identifiers carry their types, so every node's type follows
//! from its children's.
//!
//! ```text
//! λx.φ           <type(x), type(φ)>
//! ∀x.φ, ∃x.φ     t, with φ : t
//! ιx.φ           type(x), with φ : t
//! f(a)           range(f), with domain(f) matching type(a)
//! φ ∧ ψ (∨ → ↔)  t, with φ, ψ : t
//! a = b, a ≠ b   t, with a, b of one type
//! < ≤ > ≥        t over n
//! ×              n over n
//! ⊕              e over e
//! ⊑              t over e
//! ⊆ ⊂ ⊄ ⊇ ⊃ ⊅    t over two sets of one type
//! ∩ ∪            the set type of both operands
//! |A|            n, with A a set
//! (a,b)          the product of the element types
//! {a,b}          <type(a),t>, all elements of one type
//! {x | φ}        <type(x),t>, with φ : t
//! ```
//!
//! Applying a function with a polymorphic domain aligns the domain with the
//! argument's type and yields the correspondingly specialised range.

use crate::types::{E, N, T, Type, TypeError, align_types, aligned_type};

use super::expression::{BinaryOp, BinderKind, Expr, UnaryOp};

/// Either side may be the more general one.
fn compatible(a: &Type, b: &Type) -> bool {
    a.matches(b) || b.matches(a)
}

/// Of two compatible types, the one with fewer type variables.
fn more_specific(a: Type, b: Type) -> Type {
    if a.contains_type_vars() && !b.contains_type_vars() {
        b
    } else {
        a
    }
}

impl Expr {
    pub fn get_type(&self) -> Result<Type, TypeError> {
        match self {
            Expr::Ident(ident) => Ok(ident.ty.clone()),

            Expr::GApp { ty, .. } => Ok(ty.clone()),

            Expr::Binder(binder) => {
                let inner = binder.inner.get_type()?;
                match binder.kind {
                    BinderKind::Lambda => Ok(Type::composite(binder.var.ty.clone(), inner)),
                    BinderKind::ForAll | BinderKind::Exists => {
                        self.expect(&binder.inner, &inner, &T, "the body of a quantifier")?;
                        Ok(T)
                    }
                    BinderKind::Iota => {
                        self.expect(&binder.inner, &inner, &T, "the body of an iota")?;
                        Ok(binder.var.ty.clone())
                    }
                }
            }

            Expr::Binary {
                op: BinaryOp::FunApp,
                left,
                right,
            } => self.application_type(left, right),

            Expr::Binary { op, left, right } => self.infix_type(*op, left, right),

            Expr::Unary { op, inner } => {
                let ty = inner.get_type()?;
                match op {
                    UnaryOp::Parens(_) => Ok(ty),
                    UnaryOp::Not => {
                        self.expect(inner, &ty, &T, "a negated formula")?;
                        Ok(T)
                    }
                    UnaryOp::Cardinality => {
                        if ty.set_element().is_none() {
                            return Err(TypeError::mismatch(
                                self.to_string(),
                                format!("the cardinality of {} is undefined, it has type {} and is not a set", inner, ty),
                            ));
                        }
                        Ok(N)
                    }
                }
            }

            Expr::ArgList(items) => {
                let types = items
                    .iter()
                    .map(Expr::get_type)
                    .collect::<Result<Vec<_>, _>>()?;
                if types.len() < 2 {
                    return Err(TypeError::evaluation(format!(
                        "an argument list needs at least two arguments: {}",
                        self
                    )));
                }
                Ok(Type::product(types))
            }

            Expr::SetWithElements(items) => {
                let mut element: Option<Type> = None;
                for item in items {
                    let ty = item.get_type()?;
                    element = match element {
                        None => Some(ty),
                        Some(previous) if compatible(&previous, &ty) => {
                            Some(more_specific(previous, ty))
                        }
                        Some(previous) => {
                            return Err(TypeError::mismatch(
                                self.to_string(),
                                format!(
                                    "all elements of a set must have the same type, but {} has type {} where {} was expected",
                                    item, ty, previous
                                ),
                            ));
                        }
                    };
                }
                Ok(Type::set_of(element.unwrap_or(E)))
            }

            Expr::SetWithGenerator { template, filter } => {
                let element = template.get_type()?;
                let condition = filter.get_type()?;
                self.expect(filter, &condition, &T, "the condition of a set")?;
                Ok(Type::set_of(element))
            }
        }
    }

    /// Whether the expression has a type at all.
    pub fn is_well_typed(&self) -> bool {
        self.get_type().is_ok()
    }

    fn expect(&self, part: &Expr, actual: &Type, expected: &Type, role: &str) -> Result<(), TypeError> {
        if compatible(expected, actual) {
            Ok(())
        } else {
            Err(TypeError::mismatch(
                self.to_string(),
                format!("{} must be of type {}, but {} has type {}", role, expected, part, actual),
            ))
        }
    }

    fn application_type(&self, function: &Expr, argument: &Expr) -> Result<Type, TypeError> {
        let function_type = function.get_type()?;
        let argument_type = argument.get_type()?;

        let Type::Composite(domain, range) = &function_type else {
            return Err(TypeError::mismatch(
                function.to_string(),
                format!(
                    "{} is of type {}, which is not a function, and cannot be applied to {}",
                    function, function_type, argument
                ),
            ));
        };

        if domain.matches(&argument_type) && !domain.contains_type_vars() {
            return Ok((**range).clone());
        }
        if domain.contains_type_vars() || argument_type.contains_type_vars() {
            if let Ok(subst) = align_types(domain, &argument_type) {
                return Ok(aligned_type(range, &subst));
            }
        }
        Err(TypeError::mismatch(
            function.to_string(),
            format!(
                "{} takes arguments of type {}, but {} has type {}",
                function, domain, argument, argument_type
            ),
        ))
    }

    fn infix_type(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Type, TypeError> {
        use BinaryOp::*;

        let l = left.get_type()?;
        let r = right.get_type()?;
        let operand = |expected: &Type| -> Result<(), TypeError> {
            self.expect(left, &l, expected, &format!("each side of {}", op.symbol()))?;
            self.expect(right, &r, expected, &format!("each side of {}", op.symbol()))
        };

        match op {
            And | Or | If | Iff => {
                operand(&T)?;
                Ok(T)
            }
            Less | LessEq | Greater | GreaterEq => {
                operand(&N)?;
                Ok(T)
            }
            Multiplication => {
                operand(&N)?;
                Ok(N)
            }
            Fusion => {
                operand(&E)?;
                Ok(E)
            }
            PartOf => {
                operand(&E)?;
                Ok(T)
            }
            Equal | NotEqual => {
                self.same_type(&l, &r)?;
                Ok(T)
            }
            Subset | ProperSubset | NotSubset | Superset | ProperSuperset | NotSuperset => {
                self.sets_of_same_type(op, left, &l, right, &r)?;
                Ok(T)
            }
            Intersect | Union => {
                self.sets_of_same_type(op, left, &l, right, &r)?;
                Ok(more_specific(l, r))
            }
            FunApp => self.application_type(left, right),
        }
    }

    fn same_type(&self, l: &Type, r: &Type) -> Result<(), TypeError> {
        if compatible(l, r) {
            Ok(())
        } else {
            Err(TypeError::mismatch(
                self.to_string(),
                format!("both sides must have the same type, but they are {} and {}", l, r),
            ))
        }
    }

    fn sets_of_same_type(
        &self,
        op: BinaryOp,
        left: &Expr,
        l: &Type,
        right: &Expr,
        r: &Type,
    ) -> Result<(), TypeError> {
        for (part, ty) in [(left, l), (right, r)] {
            if ty.set_element().is_none() && !matches!(ty, Type::Var(_)) {
                return Err(TypeError::mismatch(
                    self.to_string(),
                    format!("{} needs sets on both sides, but {} has type {}", op.symbol(), part, ty),
                ));
            }
        }
        self.same_type(l, r)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::expression::{BinaryOp, BinderKind, Expr, Identifier, UnaryOp};
    use crate::types::{E, N, T, Type, TypeError};

    fn et() -> Type {
        Type::set_of(E)
    }

    fn p() -> Expr {
        Expr::constant("P", et())
    }

    fn a() -> Expr {
        Expr::constant("a", E)
    }

    #[test]
    fn test_application() {
        assert_eq!(Expr::app(p(), a()).get_type(), Ok(T));
    }

    #[test]
    fn test_applying_a_non_function_names_it() {
        let expr = Expr::app(a(), Expr::constant("b", E));
        match expr.get_type() {
            Err(TypeError::Mismatch { expression, .. }) => assert_eq!(expression, "a"),
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_argument_mismatch() {
        let expr = Expr::app(p(), Expr::constant("p", T));
        assert!(matches!(expr.get_type(), Err(TypeError::Mismatch { .. })));
    }

    #[test]
    fn test_lambda_and_quantifiers() {
        let x = Identifier::var("x", E);
        let body = Expr::app(p(), Expr::Ident(x.clone()));
        assert_eq!(Expr::lambda(x.clone(), body.clone()).get_type(), Ok(et()));
        assert_eq!(
            Expr::binder(BinderKind::ForAll, x.clone(), body.clone()).get_type(),
            Ok(T)
        );
        assert_eq!(Expr::binder(BinderKind::Iota, x.clone(), body).get_type(), Ok(E));
        assert!(Expr::binder(BinderKind::Exists, x.clone(), Expr::Ident(x)).get_type().is_err());
    }

    #[test]
    fn test_polymorphic_application() {
        let id = Expr::constant("ID", Type::composite(Type::var('a'), Type::var('a')));
        assert_eq!(Expr::app(id.clone(), a()).get_type(), Ok(E));
        assert_eq!(Expr::app(id, p()).get_type(), Ok(et()));
    }

    #[test]
    fn test_connectives_and_relations() {
        let pa = Expr::app(p(), a());
        assert_eq!(Expr::binary(BinaryOp::And, pa.clone(), pa.clone()).get_type(), Ok(T));
        assert!(Expr::binary(BinaryOp::And, pa, a()).get_type().is_err());
        assert_eq!(Expr::binary(BinaryOp::Equal, a(), a()).get_type(), Ok(T));
        assert!(Expr::binary(BinaryOp::Equal, a(), p()).get_type().is_err());

        let one = Expr::constant("1", N);
        assert_eq!(Expr::binary(BinaryOp::Less, one.clone(), one.clone()).get_type(), Ok(T));
        assert_eq!(Expr::binary(BinaryOp::Multiplication, one.clone(), one).get_type(), Ok(N));
        assert_eq!(Expr::binary(BinaryOp::Fusion, a(), a()).get_type(), Ok(E));
        assert_eq!(Expr::binary(BinaryOp::PartOf, a(), a()).get_type(), Ok(T));
    }

    #[test]
    fn test_set_operators() {
        let q = Expr::constant("Q", et());
        assert_eq!(Expr::binary(BinaryOp::Subset, p(), q.clone()).get_type(), Ok(T));
        assert_eq!(Expr::binary(BinaryOp::Union, p(), q).get_type(), Ok(et()));
        assert!(Expr::binary(BinaryOp::Intersect, p(), a()).get_type().is_err());
        assert_eq!(Expr::unary(UnaryOp::Cardinality, p()).get_type(), Ok(N));
        assert!(Expr::unary(UnaryOp::Cardinality, a()).get_type().is_err());
    }

    #[test]
    fn test_sets_and_tuples() {
        let b = Expr::constant("b", E);
        assert_eq!(Expr::SetWithElements(vec![a(), b.clone()]).get_type(), Ok(et()));
        assert!(Expr::SetWithElements(vec![a(), p()]).get_type().is_err());
        assert_eq!(
            Expr::ArgList(vec![a(), b]).get_type(),
            Ok(Type::product(vec![E, E]))
        );
        let x = Expr::var("x", E);
        let set = Expr::generator(x.clone(), Expr::app(p(), x));
        assert_eq!(set.get_type(), Ok(et()));
    }

    #[test]
    fn test_gapp() {
        assert_eq!(Expr::gapp(1).get_type(), Ok(E));
    }
}
