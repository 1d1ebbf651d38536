//! # Expression Trees
//!
//! The expression model shared by the parser, the renderer and the reduction
//! engine. Trees are immutable: every transformation builds a new tree.
//!
//! - [`expression`] - node definitions and operator metadata
//! - [`vars`] - free, bound and fresh variables
//! - [`equality`] - literal, alpha and operator equivalence
//! - [`typing`] - type evaluation

pub mod equality;
pub mod expression;
pub mod typing;
pub mod vars;

pub use expression::{
    Band, BinaryOp, Binder, BinderKind, Bracket, Expr, IdentKind, Identifier, UnaryOp,
};
pub use vars::fresh_variable;
