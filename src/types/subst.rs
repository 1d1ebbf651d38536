use std::collections::BTreeMap;
use std::fmt;

use super::error::TypeError;
use super::ty::{Type, TypeVar};

/// A mapping from type variables to the types they stand for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSubstitution(pub BTreeMap<TypeVar, Type>);

impl TypeSubstitution {
    pub fn empty() -> Self {
        TypeSubstitution(BTreeMap::new())
    }

    pub fn singleton(var: TypeVar, ty: Type) -> Self {
        TypeSubstitution(BTreeMap::from([(var, ty)]))
    }

    pub fn get(&self, var: &TypeVar) -> Option<&Type> {
        self.0.get(var)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeVar, &Type)> {
        self.0.iter()
    }

    /// Whether applying the substitution would change `ty`.
    pub fn affects(&self, ty: &Type) -> bool {
        ty.free_type_vars().iter().any(|v| self.0.contains_key(v))
    }

    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Atomic(_) => ty.clone(),
            Type::Var(v) => self.0.get(v).cloned().unwrap_or_else(|| ty.clone()),
            Type::Composite(domain, range) => {
                Type::composite(self.apply(domain), self.apply(range))
            }
            Type::Product(subtypes) => {
                Type::Product(subtypes.iter().map(|t| self.apply(t)).collect())
            }
        }
    }

    /// Merge `other` into this substitution.
    ///
    /// A variable already mapped to a different type is a conflict; `formal` and
    /// `actual` only describe the alignment being performed for the error.
    pub fn merge(
        &mut self,
        other: TypeSubstitution,
        formal: &Type,
        actual: &Type,
    ) -> Result<(), TypeError> {
        for (var, ty) in other.0 {
            match self.0.get(&var) {
                Some(existing) if *existing != ty => {
                    return Err(TypeError::alignment(
                        formal,
                        actual,
                        format!(
                            "type variable {} would have to be both {} and {}",
                            var, existing, ty
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    self.0.insert(var, ty);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for TypeSubstitution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries = self
            .0
            .iter()
            .map(|(var, ty)| format!("{} -> {}", var, ty))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", entries.join(", "))
    }
}
