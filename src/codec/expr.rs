use crate::ast::{BinaryOp, Binder, BinderKind, Bracket, Expr, IdentKind, Identifier, UnaryOp};
use crate::types::Type;

use super::{CodecError, Decode, Encode, Header, Reader, Writer};

const BINARY_OPS: [(BinaryOp, &str); 22] = [
    (BinaryOp::And, "and"),
    (BinaryOp::Or, "or"),
    (BinaryOp::If, "if"),
    (BinaryOp::Iff, "iff"),
    (BinaryOp::Equal, "eq"),
    (BinaryOp::NotEqual, "neq"),
    (BinaryOp::FunApp, "app"),
    (BinaryOp::Multiplication, "times"),
    (BinaryOp::Fusion, "fusion"),
    (BinaryOp::Less, "lt"),
    (BinaryOp::LessEq, "le"),
    (BinaryOp::Greater, "gt"),
    (BinaryOp::GreaterEq, "ge"),
    (BinaryOp::Subset, "subseteq"),
    (BinaryOp::ProperSubset, "subset"),
    (BinaryOp::NotSubset, "nsubset"),
    (BinaryOp::Superset, "supseteq"),
    (BinaryOp::ProperSuperset, "supset"),
    (BinaryOp::NotSuperset, "nsupset"),
    (BinaryOp::Intersect, "cap"),
    (BinaryOp::Union, "cup"),
    (BinaryOp::PartOf, "partof"),
];

const BINDERS: [(BinderKind, &str); 4] = [
    (BinderKind::ForAll, "forall"),
    (BinderKind::Exists, "exists"),
    (BinderKind::Lambda, "lambda"),
    (BinderKind::Iota, "iota"),
];

const UNARY_OPS: [(UnaryOp, &str); 4] = [
    (UnaryOp::Not, "not"),
    (UnaryOp::Parens(Bracket::Round), "parens"),
    (UnaryOp::Parens(Bracket::Square), "brackets"),
    (UnaryOp::Cardinality, "card"),
];

fn name_of<T: PartialEq + Copy>(table: &[(T, &'static str)], value: T) -> &'static str {
    table
        .iter()
        .find(|(entry, _)| *entry == value)
        .map(|(_, name)| *name)
        .unwrap_or_else(|| unreachable!("every operator has a name"))
}

fn read_name<T: Copy>(input: &mut Reader, table: &[(T, &'static str)], what: &str) -> Result<T, CodecError> {
    let offset = input.position();
    let name = input.str()?;
    table
        .iter()
        .find(|(_, entry)| *entry == name)
        .map(|(value, _)| *value)
        .ok_or_else(|| CodecError::invalid(format!("{what} '{name}'"), offset))
}

impl Encode for Identifier {
    fn encode_into(&self, out: &mut Writer) {
        out.header(match self.kind {
            IdentKind::Const => "e.const",
            IdentKind::Var => "e.var",
        });
        out.str(&self.symbol);
        self.ty.encode_into(out);
        out.flag(self.explicit_type);
        out.flag(self.starred);
    }
}

fn identifier_fields(kind: IdentKind, input: &mut Reader) -> Result<Identifier, CodecError> {
    let symbol = input.str()?;
    let ty = Type::decode_from(input)?;
    Ok(Identifier {
        kind,
        symbol,
        ty,
        explicit_type: input.flag()?,
        starred: input.flag()?,
    })
}

impl Decode for Identifier {
    fn decode_from(input: &mut Reader) -> Result<Self, CodecError> {
        let header = input.header()?;
        match header.tag.as_str() {
            "e.const" => identifier_fields(IdentKind::Const, input),
            "e.var" => identifier_fields(IdentKind::Var, input),
            _ => Err(header.unknown()),
        }
    }
}

impl Encode for Expr {
    fn encode_into(&self, out: &mut Writer) {
        match self {
            Expr::Ident(ident) => ident.encode_into(out),
            Expr::Binder(binder) => {
                out.header("e.binder");
                out.str(name_of(&BINDERS, binder.kind));
                binder.var.encode_into(out);
                binder.inner.encode_into(out);
                out.flag(binder.has_period);
            }
            Expr::Binary { op, left, right } => {
                out.header("e.binary");
                out.str(name_of(&BINARY_OPS, *op));
                left.encode_into(out);
                right.encode_into(out);
            }
            Expr::Unary { op, inner } => {
                out.header("e.unary");
                out.str(name_of(&UNARY_OPS, *op));
                inner.encode_into(out);
            }
            Expr::ArgList(items) => {
                out.header("e.args");
                out.list(items);
            }
            Expr::SetWithElements(items) => {
                out.header("e.set");
                out.list(items);
            }
            Expr::SetWithGenerator { template, filter } => {
                out.header("e.generator");
                template.encode_into(out);
                filter.encode_into(out);
            }
            Expr::GApp { index, ty } => {
                out.header("e.gapp");
                out.u32(*index);
                ty.encode_into(out);
            }
        }
    }
}

impl Decode for Expr {
    fn decode_from(input: &mut Reader) -> Result<Self, CodecError> {
        let header = input.header()?;
        match header.tag.as_str() {
            "e.const" => Ok(Expr::Ident(identifier_fields(IdentKind::Const, input)?)),
            "e.var" => Ok(Expr::Ident(identifier_fields(IdentKind::Var, input)?)),
            "e.binder" => {
                let kind = read_name(input, &BINDERS, "binder")?;
                let var = Identifier::decode_from(input)?;
                let inner = Expr::decode_from(input)?;
                Ok(Expr::Binder(Binder {
                    kind,
                    var,
                    inner: Box::new(inner),
                    has_period: input.flag()?,
                }))
            }
            "e.binary" => {
                let op = read_name(input, &BINARY_OPS, "operator")?;
                let left = Expr::decode_from(input)?;
                let right = Expr::decode_from(input)?;
                Ok(Expr::binary(op, left, right))
            }
            "e.unary" => {
                let op = read_name(input, &UNARY_OPS, "operator")?;
                Ok(Expr::unary(op, Expr::decode_from(input)?))
            }
            "e.args" => Ok(Expr::ArgList(items(input, &header)?)),
            "e.set" => Ok(Expr::SetWithElements(input.list()?)),
            "e.generator" => {
                let template = Expr::decode_from(input)?;
                let filter = Expr::decode_from(input)?;
                Ok(Expr::generator(template, filter))
            }
            "e.gapp" => {
                let index = input.u32()?;
                Ok(Expr::GApp {
                    index,
                    ty: Type::decode_from(input)?,
                })
            }
            _ => Err(header.unknown()),
        }
    }
}

/// The items of an argument list, which always has at least two.
fn items(input: &mut Reader, header: &Header) -> Result<Vec<Expr>, CodecError> {
    let items: Vec<Expr> = input.list()?;
    if items.len() < 2 {
        return Err(CodecError::invalid(
            format!("argument list of {} item(s)", items.len()),
            header.offset,
        ));
    }
    Ok(items)
}
