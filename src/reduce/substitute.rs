use crate::ast::{Expr, Identifier};

/// Replaces the free occurrences of one variable, noting every binding site
/// that would capture a free variable of the replacement.
///
/// The substitution always completes; capture is only reported, in
/// [`Substitution::accidental`].
pub struct Substitution<'a> {
    var: &'a Identifier,
    replacement: &'a Expr,
    free_in_replacement: Vec<Identifier>,
    /// Binding sites between the top of the substitution and the current node.
    sites: Vec<Expr>,
    pub accidental: Vec<Expr>,
}

impl<'a> Substitution<'a> {
    pub fn new(var: &'a Identifier, replacement: &'a Expr) -> Self {
        Substitution {
            var,
            replacement,
            free_in_replacement: replacement.free_variables(),
            sites: vec![],
            accidental: vec![],
        }
    }

    pub fn apply(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::Ident(ident) if ident == self.var => {
                self.check_capture();
                self.replacement.clone()
            }
            Expr::Binder(binder) if binder.var == *self.var => expr.clone(),
            Expr::SetWithGenerator { template, .. }
                if template.free_variables().contains(self.var) =>
            {
                expr.clone()
            }
            Expr::Binder(_) | Expr::SetWithGenerator { .. } => {
                self.sites.push(expr.clone());
                let result = expr.map_children(|child| self.apply(child));
                self.sites.pop();
                result
            }
            _ => expr.map_children(|child| self.apply(child)),
        }
    }

    fn check_capture(&mut self) {
        for site in &self.sites {
            let captures = site
                .binding_variables()
                .iter()
                .any(|bound| self.free_in_replacement.contains(bound));
            if captures && !self.accidental.contains(site) {
                self.accidental.push(site.clone());
            }
        }
    }
}

/// Rename the free occurrences of `old` to `new`. `new` must not occur in
/// `expr`, so nothing can be captured.
pub fn rename_free(expr: &Expr, old: &Identifier, new: &Identifier) -> Expr {
    match expr {
        Expr::Ident(ident) if ident == old => Expr::Ident(Identifier {
            explicit_type: ident.explicit_type,
            ..new.clone()
        }),
        Expr::Binder(binder) if binder.var == *old => expr.clone(),
        Expr::SetWithGenerator { template, .. } if template.free_variables().contains(old) => {
            expr.clone()
        }
        _ => expr.map_children(|child| rename_free(child, old, new)),
    }
}
