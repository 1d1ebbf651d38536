//! Free, bound and fresh variables.

use std::collections::BTreeSet;

use super::expression::{Expr, Identifier};

fn push_unique(list: &mut Vec<Identifier>, ident: &Identifier) {
    if !list.contains(ident) {
        list.push(ident.clone());
    }
}

impl Expr {
    /// Variables with at least one free occurrence, in order of first occurrence.
    pub fn free_variables(&self) -> Vec<Identifier> {
        let mut free = Vec::new();
        collect_free(self, &mut Vec::new(), &mut free);
        free
    }

    pub fn is_free(&self, var: &Identifier) -> bool {
        self.free_variables().contains(var)
    }

    /// Variables bound somewhere inside, by a binder or a set generator.
    pub fn bound_variables(&self) -> Vec<Identifier> {
        let mut bound = Vec::new();
        collect_bound(self, &mut bound);
        bound
    }

    /// Every variable occurring anywhere, binding positions included.
    pub fn all_variables(&self) -> Vec<Identifier> {
        let mut all = Vec::new();
        collect_all(self, &mut all);
        all
    }

    /// Every symbol used by a variable, regardless of type.
    pub fn variable_symbols(&self) -> BTreeSet<String> {
        self.all_variables().into_iter().map(|v| v.symbol).collect()
    }

    /// The variables a binding site introduces: the binder's variable, or the
    /// free variables of a generator's template. Empty for other nodes.
    pub fn binding_variables(&self) -> Vec<Identifier> {
        match self {
            Expr::Binder(binder) => vec![binder.var.clone()],
            Expr::SetWithGenerator { template, .. } => template.free_variables(),
            _ => vec![],
        }
    }
}

/// A variant of `var` whose symbol carries enough primes to avoid every
/// symbol in `taken`.
pub fn fresh_variable(var: &Identifier, taken: &BTreeSet<String>) -> Identifier {
    let mut symbol = format!("{}'", var.symbol);
    while taken.contains(&symbol) {
        symbol.push('\'');
    }
    var.renamed(symbol)
}

fn collect_free(expr: &Expr, scope: &mut Vec<Identifier>, free: &mut Vec<Identifier>) {
    match expr {
        Expr::Ident(ident) => {
            if ident.is_var() && !scope.contains(ident) {
                push_unique(free, ident);
            }
        }
        Expr::Binder(binder) => {
            scope.push(binder.var.clone());
            collect_free(&binder.inner, scope, free);
            scope.pop();
        }
        Expr::SetWithGenerator { template, filter } => {
            let introduced = template.free_variables();
            let depth = scope.len();
            scope.extend(introduced);
            collect_free(filter, scope, free);
            scope.truncate(depth);
        }
        other => {
            for child in other.children() {
                collect_free(child, scope, free);
            }
        }
    }
}

fn collect_bound(expr: &Expr, bound: &mut Vec<Identifier>) {
    for var in expr.binding_variables() {
        push_unique(bound, &var);
    }
    for child in expr.children() {
        collect_bound(child, bound);
    }
}

fn collect_all(expr: &Expr, all: &mut Vec<Identifier>) {
    match expr {
        Expr::Ident(ident) if ident.is_var() => push_unique(all, ident),
        Expr::Binder(binder) => push_unique(all, &binder.var),
        _ => {}
    }
    for child in expr.children() {
        collect_all(child, all);
    }
}
