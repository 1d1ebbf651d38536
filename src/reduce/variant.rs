//! Alphabetic and alphatypical variants.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::ast::{Binder, Expr, Identifier, fresh_variable};
use crate::types::TypeSubstitution;

use super::substitute::rename_free;

/// Rename the variables bound at each of the `sites` to fresh primed
/// variables. Nested sites are renamed innermost first.
///
/// `taken` holds every symbol that must not be reused and grows with each
/// fresh name handed out.
pub fn alphabetic_variant(expr: &Expr, sites: &[Expr], taken: &mut BTreeSet<String>) -> Expr {
    let renamed = expr.map_children(|child| alphabetic_variant(child, sites, taken));
    if !sites.contains(expr) {
        return renamed;
    }

    match renamed {
        Expr::Binder(binder) => {
            let fresh = fresh_variable(&binder.var, taken);
            taken.insert(fresh.symbol.clone());
            debug!("renaming bound {} to {}", binder.var.symbol, fresh.symbol);
            let inner = rename_free(&binder.inner, &binder.var, &fresh);
            Expr::Binder(Binder {
                var: fresh,
                inner: Box::new(inner),
                ..binder
            })
        }
        Expr::SetWithGenerator { template, filter } => {
            let (mut template, mut filter) = (*template, *filter);
            for var in template.free_variables() {
                let fresh = fresh_variable(&var, taken);
                taken.insert(fresh.symbol.clone());
                debug!("renaming generator variable {} to {}", var.symbol, fresh.symbol);
                template = rename_free(&template, &var, &fresh);
                filter = rename_free(&filter, &var, &fresh);
            }
            Expr::generator(template, filter)
        }
        other => other,
    }
}

/// Specialise an expression to the types an alignment fixed.
///
/// Every identifier whose type mentions an aligned type variable is retyped;
/// variables are also renamed to fresh symbols, the same old variable always
/// becoming the same new one.
pub fn alphatypical_variant(expr: &Expr, subst: &TypeSubstitution, taken: &mut BTreeSet<String>) -> Expr {
    let mut renaming = HashMap::new();
    retype(expr, subst, taken, &mut renaming)
}

fn retype(
    expr: &Expr,
    subst: &TypeSubstitution,
    taken: &mut BTreeSet<String>,
    renaming: &mut HashMap<Identifier, Identifier>,
) -> Expr {
    match expr {
        Expr::Ident(ident) => Expr::Ident(retype_identifier(ident, subst, taken, renaming)),
        Expr::GApp { index, ty } => Expr::GApp {
            index: *index,
            ty: subst.apply(ty),
        },
        Expr::Binder(binder) => {
            let var = retype_identifier(&binder.var, subst, taken, renaming);
            let inner = retype(&binder.inner, subst, taken, renaming);
            Expr::Binder(Binder {
                kind: binder.kind,
                var,
                inner: Box::new(inner),
                has_period: binder.has_period,
            })
        }
        _ => expr.map_children(|child| retype(child, subst, taken, renaming)),
    }
}

fn retype_identifier(
    ident: &Identifier,
    subst: &TypeSubstitution,
    taken: &mut BTreeSet<String>,
    renaming: &mut HashMap<Identifier, Identifier>,
) -> Identifier {
    if !subst.affects(&ident.ty) {
        return ident.clone();
    }
    if !ident.is_var() {
        return ident.retyped(subst.apply(&ident.ty));
    }
    if let Some(renamed) = renaming.get(ident) {
        return Identifier {
            explicit_type: ident.explicit_type,
            ..renamed.clone()
        };
    }
    let fresh = fresh_variable(&ident.retyped(subst.apply(&ident.ty)), taken);
    taken.insert(fresh.symbol.clone());
    renaming.insert(ident.clone(), fresh.clone());
    fresh
}
