use crate::ast::{BinaryOp, Binder, Bracket, Expr, Identifier, UnaryOp};
use crate::parser::escape_name;
use crate::types::{E, Type};

use super::RenderMode;

struct Formatter {
    buffer: String,
    mode: RenderMode,
}

impl Formatter {
    fn new(mode: RenderMode) -> Self {
        Self {
            buffer: String::new(),
            mode,
        }
    }

    /// Write text that may need escaping in the target format.
    fn write_str(&mut self, s: &str) {
        match self.mode {
            RenderMode::Html => {
                for c in s.chars() {
                    match c {
                        '<' => self.buffer.push_str("&lt;"),
                        '>' => self.buffer.push_str("&gt;"),
                        '&' => self.buffer.push_str("&amp;"),
                        c => self.buffer.push(c),
                    }
                }
            }
            RenderMode::Txt | RenderMode::Latex => self.buffer.push_str(s),
        }
    }

    /// Write markup verbatim.
    fn write_raw(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn open_brace(&mut self) {
        match self.mode {
            RenderMode::Latex => self.write_raw("\\{"),
            _ => self.write_raw("{"),
        }
    }

    fn close_brace(&mut self) {
        match self.mode {
            RenderMode::Latex => self.write_raw("\\}"),
            _ => self.write_raw("}"),
        }
    }

    fn finish(self) -> String {
        self.buffer
    }
}

pub(super) fn render(expr: &Expr, mode: RenderMode) -> String {
    let mut fmt = Formatter::new(mode);
    format_expression(expr, &mut fmt);
    fmt.finish()
}

fn format_expression(expr: &Expr, fmt: &mut Formatter) {
    match expr {
        Expr::Ident(ident) => format_identifier(ident, fmt),
        Expr::Binder(binder) => format_binder(binder, fmt),
        Expr::Binary {
            op: BinaryOp::FunApp,
            left,
            right,
        } => format_application(left, right, fmt),
        Expr::Binary { op, left, right } => format_infix(*op, left, right, fmt),
        Expr::Unary { op, inner } => format_unary(*op, inner, fmt),
        Expr::ArgList(items) => {
            fmt.write_raw("(");
            format_list(items, ",", fmt);
            fmt.write_raw(")");
        }
        Expr::SetWithElements(items) => {
            fmt.open_brace();
            format_list(items, ", ", fmt);
            fmt.close_brace();
        }
        Expr::SetWithGenerator { template, filter } => {
            fmt.open_brace();
            format_expression(template, fmt);
            match fmt.mode {
                RenderMode::Latex => fmt.write_raw(" \\mid "),
                _ => fmt.write_raw(" | "),
            }
            format_expression(filter, fmt);
            fmt.close_brace();
        }
        Expr::GApp { index, ty } => {
            fmt.write_raw(&format!("g({})", index));
            if *ty != E {
                format_type_annotation(ty, fmt);
            }
        }
    }
}

fn format_list(items: &[Expr], separator: &str, fmt: &mut Formatter) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            fmt.write_raw(separator);
        }
        format_expression(item, fmt);
    }
}

fn format_bracketed(expr: &Expr, fmt: &mut Formatter) {
    fmt.write_raw("[");
    format_expression(expr, fmt);
    fmt.write_raw("]");
}

fn format_identifier(ident: &Identifier, fmt: &mut Formatter) {
    match fmt.mode {
        RenderMode::Latex => fmt.write_raw(&latex_symbol(&ident.symbol)),
        _ => fmt.write_str(&ident.symbol),
    }
    if ident.starred {
        match fmt.mode {
            RenderMode::Latex => fmt.write_raw("^{*}"),
            _ => fmt.write_raw("*"),
        }
    }
    if ident.explicit_type {
        format_type_annotation(&ident.ty, fmt);
    }
}

/// An identifier with its Greek letters and `∅` spelled as commands.
fn latex_symbol(symbol: &str) -> String {
    let mut out = String::new();
    let mut chars = symbol.chars().peekable();
    while let Some(c) = chars.next() {
        match escape_name(c) {
            Some(name) => {
                out.push('\\');
                out.push_str(name);
                if chars.peek().is_some_and(|next| next.is_ascii_alphabetic()) {
                    out.push(' ');
                }
            }
            None => out.push(c),
        }
    }
    out
}

fn format_type_annotation(ty: &Type, fmt: &mut Formatter) {
    match fmt.mode {
        RenderMode::Txt => {
            fmt.write_raw("_");
            fmt.write_raw(&ty.pretty());
        }
        RenderMode::Html => {
            fmt.write_raw("<sub>");
            fmt.write_str(&ty.pretty());
            fmt.write_raw("</sub>");
        }
        RenderMode::Latex => {
            let latex = ty
                .pretty()
                .replace('<', "\\langle ")
                .replace('>', "\\rangle ")
                .replace('*', "\\times ");
            fmt.write_raw("_{");
            fmt.write_raw(latex.trim_end());
            fmt.write_raw("}");
        }
    }
}

fn format_binder(binder: &Binder, fmt: &mut Formatter) {
    match fmt.mode {
        RenderMode::Latex => {
            fmt.write_raw(binder.kind.latex());
            fmt.write_raw(" ");
        }
        _ => fmt.write_raw(binder.kind.symbol()),
    }
    format_identifier(&binder.var, fmt);

    let body = &binder.inner;
    if binder.has_period {
        fmt.write_raw(".");
    }
    if body.infix_band().is_some() {
        format_bracketed(body, fmt);
    } else {
        if !binder.has_period {
            fmt.write_raw(" ");
        }
        format_expression(body, fmt);
    }
}

fn format_application(function: &Expr, argument: &Expr, fmt: &mut Formatter) {
    let wrap_function = function.ends_open()
        || function.infix_band().is_some()
        || matches!(
            function,
            Expr::Unary {
                op: UnaryOp::Not,
                ..
            }
        );
    if wrap_function {
        format_bracketed(function, fmt);
    } else {
        format_expression(function, fmt);
    }

    match argument {
        Expr::ArgList(_)
        | Expr::Unary {
            op: UnaryOp::Parens(Bracket::Round),
            ..
        } => format_expression(argument, fmt),
        _ => {
            fmt.write_raw("(");
            format_expression(argument, fmt);
            fmt.write_raw(")");
        }
    }
}

fn format_infix(op: BinaryOp, left: &Expr, right: &Expr, fmt: &mut Formatter) {
    let band = op.band();

    let same_associative = matches!(left, Expr::Binary { op: inner, .. } if *inner == op && op.is_associative());
    let wrap_left = left.ends_open()
        || (left.infix_band().is_some() && left.infix_band() >= band && !same_associative);
    if wrap_left {
        format_bracketed(left, fmt);
    } else {
        format_expression(left, fmt);
    }

    fmt.write_raw(" ");
    match fmt.mode {
        RenderMode::Latex => fmt.write_raw(op.latex()),
        _ => fmt.write_str(op.symbol()),
    }
    fmt.write_raw(" ");

    let wrap_right = right.infix_band().is_some() && right.infix_band() >= band;
    if wrap_right {
        format_bracketed(right, fmt);
    } else {
        format_expression(right, fmt);
    }
}

fn format_unary(op: UnaryOp, inner: &Expr, fmt: &mut Formatter) {
    match op {
        UnaryOp::Not => {
            match fmt.mode {
                RenderMode::Latex => fmt.write_raw("\\neg "),
                _ => fmt.write_raw("¬"),
            }
            if inner.infix_band().is_some() {
                format_bracketed(inner, fmt);
            } else {
                format_expression(inner, fmt);
            }
        }
        UnaryOp::Parens(Bracket::Round) => {
            fmt.write_raw("(");
            format_expression(inner, fmt);
            fmt.write_raw(")");
        }
        UnaryOp::Parens(Bracket::Square) => format_bracketed(inner, fmt),
        UnaryOp::Cardinality => {
            fmt.write_raw("|");
            format_expression(inner, fmt);
            fmt.write_raw("|");
        }
    }
}
