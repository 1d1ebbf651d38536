//! Rendering of expressions as plain text, HTML or LaTeX.
//!
//! Brackets are inserted wherever the tree would otherwise read differently,
//! so the plain-text rendering parses back to an alpha-equivalent tree.

mod render;

use std::fmt;

use crate::ast::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Txt,
    Html,
    Latex,
}

impl Expr {
    pub fn render(&self, mode: RenderMode) -> String {
        render::render(self, mode)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(RenderMode::Txt))
    }
}
