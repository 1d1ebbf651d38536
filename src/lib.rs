//! # lambdacalc - Typed Lambda Calculus for Formal Semantics
//!
//! A typed lambda calculus engine in the style used by natural-language
//! semanticists: first-order logic with binders, sets and Montague-style types,
//! plus beta reduction that avoids variable capture.
//!
//! ## Pipeline
//!
//! ```text
//! Text (String)
//!     ↓
//! [Parser] → candidate trees, filtered by length, typing and uniqueness
//!     ↓
//! [Expr] → get_type() / render()
//!     ↓
//! [Lambda conversion] → one step at a time, or simplify_fully()
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Nondeterministic parsing
//! Every grammar rule returns all the readings it finds. Ambiguity is resolved
//! after the fact: the longest readings win, then the well-typed ones, and any
//! remaining disagreement is reported as an ambiguity with every reading.
//!
//! ### Types as values
//! Types are immutable values with structural equality. The lax comparison in
//! which a type variable matches anything is a separate method,
//! [`types::Type::matches`]. Polymorphic functions are resolved by
//! [`types::align_types`].
//!
//! ### Capture is reported, then fixed
//! Substitution always completes and records the binders that captured a
//! variable. The step is then redone on an alphabetic variant, and both the
//! variant and the naive result are returned.
//!
//! ## Module Structure
//!
//! - [`types`] - Type model, type parser and alignment
//! - [`typer`] - Conventions mapping identifier names to types
//! - [`ast`] - Expression trees, variables, equality and typing
//! - [`fmt`] - Rendering as plain text, HTML or LaTeX
//! - [`parser`] - The expression parser
//! - [`reduce`] - Lambda conversion
//! - [`codec`] - Tagged, versioned binary encoding of types and expressions
//!
//! ## Example
//!
//! ```
//! use lambdacalc::parser::{ParseOptions, parse};
//!
//! let mut options = ParseOptions::new().ascii(true);
//! let expr = parse("(Lx.P(x) & Q(x))(a)", &mut options).unwrap();
//! assert_eq!(expr.simplify_fully().to_string(), "P(a) ∧ Q(a)");
//! ```

pub mod ast;
pub mod codec;
pub mod fmt;
pub mod parser;
pub mod reduce;
pub mod typer;
pub mod types;
