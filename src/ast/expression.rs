use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::types::{E, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentKind {
    Const,
    Var,
}

/// A constant or variable.
///
/// Two identifiers are the same identifier when kind, symbol, type and the
/// starred flag agree. Whether the type was written out only matters when
/// rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: IdentKind,
    pub symbol: String,
    pub ty: Type,
    pub explicit_type: bool,
    pub starred: bool,
}

impl Identifier {
    pub fn new(kind: IdentKind, symbol: impl Into<String>, ty: Type) -> Self {
        Identifier {
            kind,
            symbol: symbol.into(),
            ty,
            explicit_type: false,
            starred: false,
        }
    }

    pub fn var(symbol: impl Into<String>, ty: Type) -> Self {
        Identifier::new(IdentKind::Var, symbol, ty)
    }

    pub fn constant(symbol: impl Into<String>, ty: Type) -> Self {
        Identifier::new(IdentKind::Const, symbol, ty)
    }

    pub fn with_explicit_type(mut self) -> Self {
        self.explicit_type = true;
        self
    }

    pub fn starred(mut self) -> Self {
        self.starred = true;
        self
    }

    pub fn is_var(&self) -> bool {
        self.kind == IdentKind::Var
    }

    /// The same identifier under another name.
    pub fn renamed(&self, symbol: impl Into<String>) -> Self {
        Identifier {
            symbol: symbol.into(),
            ..self.clone()
        }
    }

    /// The same identifier with another type.
    pub fn retyped(&self, ty: Type) -> Self {
        Identifier { ty, ..self.clone() }
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.symbol == other.symbol
            && self.ty == other.ty
            && self.starred == other.starred
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.symbol.hash(state);
        self.ty.hash(state);
        self.starred.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinderKind {
    ForAll,
    Exists,
    Lambda,
    Iota,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binder {
    pub kind: BinderKind,
    pub var: Identifier,
    pub inner: Box<Expr>,
    /// Whether a period separated the variable from the body in the source.
    pub has_period: bool,
}

/// Binary operator kinds.
///
/// `FunApp` is function application; all others are written infix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    And,
    Or,
    If,
    Iff,
    Equal,
    NotEqual,
    FunApp,
    Multiplication,
    Fusion,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Subset,
    ProperSubset,
    NotSubset,
    Superset,
    ProperSuperset,
    NotSuperset,
    Intersect,
    Union,
    PartOf,
}

/// Precedence bands of the infix operators, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Tight,
    Relation,
    Connective,
}

impl BinaryOp {
    pub const INFIX: [BinaryOp; 21] = [
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::If,
        BinaryOp::Iff,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::Multiplication,
        BinaryOp::Fusion,
        BinaryOp::Less,
        BinaryOp::LessEq,
        BinaryOp::Greater,
        BinaryOp::GreaterEq,
        BinaryOp::Subset,
        BinaryOp::ProperSubset,
        BinaryOp::NotSubset,
        BinaryOp::Superset,
        BinaryOp::ProperSuperset,
        BinaryOp::NotSuperset,
        BinaryOp::Intersect,
        BinaryOp::Union,
        BinaryOp::PartOf,
    ];

    pub fn is_infix(self) -> bool {
        self != BinaryOp::FunApp
    }

    pub fn band(self) -> Option<Band> {
        use BinaryOp::*;
        match self {
            Multiplication | Fusion | Intersect | Union => Some(Band::Tight),
            Equal | NotEqual | Less | LessEq | Greater | GreaterEq | Subset | ProperSubset
            | NotSubset | Superset | ProperSuperset | NotSuperset | PartOf => Some(Band::Relation),
            And | Or | If | Iff => Some(Band::Connective),
            FunApp => None,
        }
    }

    /// Operators whose repetition groups to the left without brackets.
    pub fn is_associative(self) -> bool {
        use BinaryOp::*;
        matches!(self, And | Or | Multiplication | Fusion | Intersect | Union)
    }

    /// The Unicode glyph.
    pub fn symbol(self) -> &'static str {
        use BinaryOp::*;
        match self {
            And => "∧",
            Or => "∨",
            If => "→",
            Iff => "↔",
            Equal => "=",
            NotEqual => "≠",
            FunApp => "",
            Multiplication => "×",
            Fusion => "⊕",
            Less => "<",
            LessEq => "≤",
            Greater => ">",
            GreaterEq => "≥",
            Subset => "⊆",
            ProperSubset => "⊂",
            NotSubset => "⊄",
            Superset => "⊇",
            ProperSuperset => "⊃",
            NotSuperset => "⊅",
            Intersect => "∩",
            Union => "∪",
            PartOf => "⊑",
        }
    }

    /// The keyboard spelling accepted in ASCII mode.
    pub fn ascii(self) -> &'static str {
        use BinaryOp::*;
        match self {
            And => "&",
            Or => "V",
            If => "->",
            Iff => "<->",
            Equal => "=",
            NotEqual => "!=",
            FunApp => "",
            Multiplication => "*",
            Fusion => "+",
            Less => "<",
            LessEq => "<=",
            Greater => ">",
            GreaterEq => ">=",
            Subset => "<<",
            ProperSubset => "<<<",
            NotSubset => "!<<",
            Superset => ">>",
            ProperSuperset => ">>>",
            NotSuperset => "!>>",
            Intersect => "@I",
            Union => "@U",
            PartOf => "<:",
        }
    }

    pub fn latex(self) -> &'static str {
        use BinaryOp::*;
        match self {
            And => "\\wedge",
            Or => "\\vee",
            If => "\\rightarrow",
            Iff => "\\leftrightarrow",
            Equal => "=",
            NotEqual => "\\neq",
            FunApp => "",
            Multiplication => "\\times",
            Fusion => "\\oplus",
            Less => "<",
            LessEq => "\\leq",
            Greater => ">",
            GreaterEq => "\\geq",
            Subset => "\\subseteq",
            ProperSubset => "\\subset",
            NotSubset => "\\not\\subset",
            Superset => "\\supseteq",
            ProperSuperset => "\\supset",
            NotSuperset => "\\not\\supset",
            Intersect => "\\cap",
            Union => "\\cup",
            PartOf => "\\sqsubseteq",
        }
    }

    /// Whether the operator may be written without surrounding whitespace.
    pub fn allows_tight_spacing(self) -> bool {
        matches!(self, BinaryOp::Multiplication | BinaryOp::Fusion)
    }

    pub fn from_symbol(c: char) -> Option<BinaryOp> {
        BinaryOp::INFIX
            .into_iter()
            .find(|op| op.symbol().chars().eq(std::iter::once(c)))
    }
}

impl BinderKind {
    pub fn symbol(self) -> &'static str {
        match self {
            BinderKind::ForAll => "∀",
            BinderKind::Exists => "∃",
            BinderKind::Lambda => "λ",
            BinderKind::Iota => "ι",
        }
    }

    pub fn latex(self) -> &'static str {
        match self {
            BinderKind::ForAll => "\\forall",
            BinderKind::Exists => "\\exists",
            BinderKind::Lambda => "\\lambda",
            BinderKind::Iota => "\\iota",
        }
    }

    pub fn from_symbol(c: char) -> Option<BinderKind> {
        match c {
            '∀' => Some(BinderKind::ForAll),
            '∃' => Some(BinderKind::Exists),
            'λ' => Some(BinderKind::Lambda),
            'ι' => Some(BinderKind::Iota),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Parens(Bracket),
    Cardinality,
}

/// An expression tree.
///
/// `PartialEq` is literal equality up to parentheses; see
/// [`Expr::alpha_equivalent`] and [`Expr::operator_equivalent`] for the
/// coarser comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Ident(Identifier),
    Binder(Binder),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        inner: Box<Expr>,
    },
    /// The arguments of a predicate of arity two or more.
    ArgList(Vec<Expr>),
    SetWithElements(Vec<Expr>),
    /// `{template | filter}`; the template's free variables are bound in the filter.
    SetWithGenerator {
        template: Box<Expr>,
        filter: Box<Expr>,
    },
    /// The assignment function applied to an index, `g(1)`.
    GApp {
        index: u32,
        ty: Type,
    },
}

impl Expr {
    pub fn var(symbol: impl Into<String>, ty: Type) -> Self {
        Expr::Ident(Identifier::var(symbol, ty))
    }

    pub fn constant(symbol: impl Into<String>, ty: Type) -> Self {
        Expr::Ident(Identifier::constant(symbol, ty))
    }

    pub fn binder(kind: BinderKind, var: Identifier, inner: Expr) -> Self {
        Expr::Binder(Binder {
            kind,
            var,
            inner: Box::new(inner),
            has_period: true,
        })
    }

    pub fn lambda(var: Identifier, inner: Expr) -> Self {
        Expr::binder(BinderKind::Lambda, var, inner)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn app(function: Expr, argument: Expr) -> Self {
        Expr::binary(BinaryOp::FunApp, function, argument)
    }

    pub fn unary(op: UnaryOp, inner: Expr) -> Self {
        Expr::Unary {
            op,
            inner: Box::new(inner),
        }
    }

    pub fn not(inner: Expr) -> Self {
        Expr::unary(UnaryOp::Not, inner)
    }

    pub fn parens(inner: Expr) -> Self {
        Expr::unary(UnaryOp::Parens(Bracket::Round), inner)
    }

    pub fn generator(template: Expr, filter: Expr) -> Self {
        Expr::SetWithGenerator {
            template: Box::new(template),
            filter: Box::new(filter),
        }
    }

    /// `g(index)` of type `e`.
    pub fn gapp(index: u32) -> Self {
        Expr::GApp { index, ty: E }
    }

    /// Remove any number of enclosing brackets.
    pub fn strip_parens(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Unary {
            op: UnaryOp::Parens(_),
            inner,
        } = expr
        {
            expr = inner;
        }
        expr
    }

    pub fn as_binder(&self) -> Option<&Binder> {
        match self {
            Expr::Binder(binder) => Some(binder),
            _ => None,
        }
    }

    /// The band of an infix node, `None` for everything else.
    pub fn infix_band(&self) -> Option<Band> {
        match self {
            Expr::Binary { op, .. } => op.band(),
            _ => None,
        }
    }

    /// Whether the rendering ends in a binder body that would swallow anything
    /// written after it.
    pub fn ends_open(&self) -> bool {
        match self {
            Expr::Binder(_) => true,
            Expr::Unary {
                op: UnaryOp::Not,
                inner,
            } => inner.ends_open(),
            Expr::Binary { op, right, .. } if op.is_infix() => right.ends_open(),
            _ => false,
        }
    }

    /// The direct subexpressions, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Ident(_) | Expr::GApp { .. } => vec![],
            Expr::Binder(binder) => vec![&binder.inner],
            Expr::Binary { left, right, .. } => vec![left, right],
            Expr::Unary { inner, .. } => vec![inner],
            Expr::ArgList(items) | Expr::SetWithElements(items) => items.iter().collect(),
            Expr::SetWithGenerator { template, filter } => vec![template, filter],
        }
    }

    /// A copy with every direct subexpression passed through `f`, left to right.
    pub fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Ident(_) | Expr::GApp { .. } => self.clone(),
            Expr::Binder(binder) => Expr::Binder(Binder {
                inner: Box::new(f(&binder.inner)),
                ..binder.clone()
            }),
            Expr::Binary { op, left, right } => {
                let left = f(left);
                let right = f(right);
                Expr::binary(*op, left, right)
            }
            Expr::Unary { op, inner } => Expr::unary(*op, f(inner)),
            Expr::ArgList(items) => Expr::ArgList(items.iter().map(f).collect()),
            Expr::SetWithElements(items) => Expr::SetWithElements(items.iter().map(f).collect()),
            Expr::SetWithGenerator { template, filter } => {
                let template = f(template);
                let filter = f(filter);
                Expr::generator(template, filter)
            }
        }
    }

    /// A copy with the `index`-th child (in [`Expr::children`] order) replaced.
    pub fn replace_child(&self, index: usize, child: Expr) -> Expr {
        let mut child = Some(child);
        let mut i = 0;
        self.map_children(|original| {
            let replaced = if i == index { child.take() } else { None };
            i += 1;
            replaced.unwrap_or_else(|| original.clone())
        })
    }
}
