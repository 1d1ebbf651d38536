use super::error::TypeError;
use super::subst::TypeSubstitution;
use super::ty::Type;

/// Align a polymorphic `formal` type against an `actual` type.
///
/// This is a one-directional cousin of unification: both types are walked in
/// lock-step and every type variable met opposite a type records what it stands
/// for. There are no recursive types, so there is no occurs check.
///
/// ```text
/// align(<'a,t>, <e,t>)          = {'a -> e}
/// align(<'a,<'b,t>>, <e,<n,t>>) = {'a -> e, 'b -> n}
/// align(<'a,'a>, <e,t>)         = Error ('a cannot be both e and t)
/// align(<'a,t>, e)              = Error (composite against atomic)
/// ```
///
/// At composite and product nodes the child substitutions are merged; a
/// variable mapped to two different types fails the whole alignment.
pub fn align_types(formal: &Type, actual: &Type) -> Result<TypeSubstitution, TypeError> {
    match (formal, actual) {
        (Type::Var(a), Type::Var(b)) if a == b => Ok(TypeSubstitution::empty()),
        (Type::Var(v), ty) | (ty, Type::Var(v)) => {
            Ok(TypeSubstitution::singleton(*v, ty.clone()))
        }

        (Type::Atomic(a), Type::Atomic(b)) => {
            if a == b {
                Ok(TypeSubstitution::empty())
            } else {
                Err(TypeError::alignment(
                    formal,
                    actual,
                    format!("{} and {} are different types", a, b),
                ))
            }
        }

        (Type::Composite(d1, r1), Type::Composite(d2, r2)) => {
            let mut subst = align_types(d1, d2)?;
            let range = align_types(r1, r2)?;
            subst.merge(range, formal, actual)?;
            Ok(subst)
        }

        (Type::Product(a), Type::Product(b)) => {
            if a.len() != b.len() {
                return Err(TypeError::alignment(
                    formal,
                    actual,
                    format!(
                        "a product of {} types cannot match a product of {} types",
                        a.len(),
                        b.len()
                    ),
                ));
            }
            let mut subst = TypeSubstitution::empty();
            for (x, y) in a.iter().zip(b) {
                subst.merge(align_types(x, y)?, formal, actual)?;
            }
            Ok(subst)
        }

        (Type::Composite(..), _) | (_, Type::Composite(..)) => Err(TypeError::alignment(
            formal,
            actual,
            "a function type cannot match a non-function type",
        )),

        _ => Err(TypeError::alignment(
            formal,
            actual,
            "the types have different shapes",
        )),
    }
}

/// Materialise the concrete type implied by an alignment.
pub fn aligned_type(ty: &Type, subst: &TypeSubstitution) -> Type {
    subst.apply(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ty::{E, N, T, TypeVar};

    fn et() -> Type {
        Type::composite(E, T)
    }

    #[test]
    fn test_align_identical_concrete() {
        assert_eq!(align_types(&et(), &et()), Ok(TypeSubstitution::empty()));
    }

    #[test]
    fn test_align_var_in_domain() {
        let formal = Type::composite(Type::var('a'), T);
        let subst = align_types(&formal, &et()).unwrap();
        assert_eq!(subst, TypeSubstitution::singleton(TypeVar('a'), E));
    }

    #[test]
    fn test_align_var_against_composite() {
        let subst = align_types(&Type::var('a'), &et()).unwrap();
        assert_eq!(subst.get(&TypeVar('a')), Some(&et()));
    }

    #[test]
    fn test_align_two_vars() {
        let formal = Type::composite(Type::var('a'), Type::composite(Type::var('b'), T));
        let actual = Type::composite(E, Type::composite(N, T));
        let subst = align_types(&formal, &actual).unwrap();
        assert_eq!(subst.get(&TypeVar('a')), Some(&E));
        assert_eq!(subst.get(&TypeVar('b')), Some(&N));
    }

    #[test]
    fn test_align_inconsistent_var() {
        let formal = Type::composite(Type::var('a'), Type::var('a'));
        let result = align_types(&formal, &et());
        match result {
            Err(TypeError::Alignment { reason, .. }) => {
                assert!(reason.contains("'a"), "reason was: {}", reason);
            }
            other => panic!("expected alignment error, got {:?}", other),
        }
    }

    #[test]
    fn test_align_consistent_repeated_var() {
        let formal = Type::composite(Type::var('a'), Type::var('a'));
        let subst = align_types(&formal, &Type::composite(E, E)).unwrap();
        assert_eq!(subst.len(), 1);
    }

    #[test]
    fn test_align_products() {
        let formal = Type::composite(Type::product(vec![Type::var('a'), E]), T);
        let actual = Type::composite(Type::product(vec![N, E]), T);
        let subst = align_types(&formal, &actual).unwrap();
        assert_eq!(subst.get(&TypeVar('a')), Some(&N));
    }

    #[test]
    fn test_align_product_arity_mismatch() {
        let formal = Type::product(vec![Type::var('a'), E]);
        let actual = Type::product(vec![E, E, E]);
        assert!(align_types(&formal, &actual).is_err());
    }

    #[test]
    fn test_align_shape_mismatch() {
        let formal = Type::composite(Type::var('a'), T);
        assert!(align_types(&formal, &E).is_err());
    }

    #[test]
    fn test_align_atomic_mismatch() {
        assert!(align_types(&E, &T).is_err());
    }

    #[test]
    fn test_aligned_type() {
        let formal = Type::composite(Type::var('a'), Type::composite(Type::var('a'), T));
        let subst = TypeSubstitution::singleton(TypeVar('a'), E);
        assert_eq!(
            aligned_type(&formal, &subst),
            Type::composite(E, Type::composite(E, T))
        );
    }
}
