use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Entities.
pub const E: Type = Type::Atomic('e');
/// Truth values.
pub const T: Type = Type::Atomic('t');
/// Situations / worlds.
pub const S: Type = Type::Atomic('s');
/// Numbers.
pub const N: Type = Type::Atomic('n');

/// A polymorphic placeholder, written `'a` in type syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVar(pub char);

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}", self.0)
    }
}

/// A semantic type.
///
/// The derived comparisons are strictly structural. Use [`Type::matches`] for the
/// lax comparison in which a type variable stands for any type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Atomic(char),
    Var(TypeVar),
    Composite(Box<Type>, Box<Type>),
    /// Always holds at least two subtypes.
    Product(Vec<Type>),
}

impl Type {
    pub fn composite(domain: Type, range: Type) -> Self {
        Type::Composite(Box::new(domain), Box::new(range))
    }

    /// Builds a product type.
    ///
    /// # Panics
    ///
    /// Panics when given fewer than two subtypes.
    pub fn product(subtypes: Vec<Type>) -> Self {
        assert!(
            subtypes.len() >= 2,
            "a product type needs at least two subtypes, got {}",
            subtypes.len()
        );
        Type::Product(subtypes)
    }

    pub fn var(symbol: char) -> Self {
        Type::Var(TypeVar(symbol))
    }

    /// The characteristic-function type of sets of `element`, i.e. `<element,t>`.
    pub fn set_of(element: Type) -> Self {
        Type::composite(element, T)
    }

    pub fn domain(&self) -> Option<&Type> {
        match self {
            Type::Composite(domain, _) => Some(domain),
            _ => None,
        }
    }

    pub fn range(&self) -> Option<&Type> {
        match self {
            Type::Composite(_, range) => Some(range),
            _ => None,
        }
    }

    /// Atomic types and type variables may be juxtaposed and multiplied.
    pub fn is_simple(&self) -> bool {
        matches!(self, Type::Atomic(_) | Type::Var(_))
    }

    /// The element type when this is a set type `<X,t>`.
    pub fn set_element(&self) -> Option<&Type> {
        match self {
            Type::Composite(domain, range) if **range == T => Some(domain),
            _ => None,
        }
    }

    pub fn free_type_vars(&self) -> BTreeSet<TypeVar> {
        match self {
            Type::Atomic(_) => BTreeSet::new(),
            Type::Var(v) => BTreeSet::from([*v]),
            Type::Composite(domain, range) => {
                let mut set = domain.free_type_vars();
                set.extend(range.free_type_vars());
                set
            }
            Type::Product(subtypes) => subtypes
                .iter()
                .flat_map(|t| t.free_type_vars())
                .collect(),
        }
    }

    pub fn contains_type_vars(&self) -> bool {
        match self {
            Type::Atomic(_) => false,
            Type::Var(_) => true,
            Type::Composite(domain, range) => {
                domain.contains_type_vars() || range.contains_type_vars()
            }
            Type::Product(subtypes) => subtypes.iter().any(Type::contains_type_vars),
        }
    }

    /// Lax equality: a type variable in `self` matches anything in `other`.
    ///
    /// The relation is asymmetric, `self` is the more general side.
    pub fn matches(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Var(_), _) => true,
            (Type::Atomic(a), Type::Atomic(b)) => a == b,
            (Type::Composite(d1, r1), Type::Composite(d2, r2)) => {
                d1.matches(d2) && r1.matches(r2)
            }
            (Type::Product(a), Type::Product(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.matches(y))
            }
            _ => false,
        }
    }

    /// Bracketed notation: `<e,<e,t>>`, `<e*e,t>`, `'a`.
    pub fn pretty(&self) -> String {
        match self {
            Type::Atomic(c) => c.to_string(),
            Type::Var(v) => v.to_string(),
            Type::Composite(domain, range) => {
                format!("<{},{}>", domain.pretty(), range.pretty())
            }
            Type::Product(subtypes) => subtypes
                .iter()
                .map(Type::pretty)
                .collect::<Vec<_>>()
                .join("*"),
        }
    }

    /// Short notation: a composite of two simple types is written by
    /// juxtaposition, so `<e,<e,t>>` becomes `<e,et>`.
    pub fn short(&self) -> String {
        match self {
            Type::Composite(domain, range) if domain.is_simple() && range.is_simple() => {
                format!("{}{}", domain.pretty(), range.pretty())
            }
            Type::Composite(domain, range) => {
                format!("<{},{}>", domain.short(), range.short())
            }
            _ => self.pretty(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
