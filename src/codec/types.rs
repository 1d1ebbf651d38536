use crate::types::{Type, TypeVar};

use super::{CodecError, Decode, Encode, Reader, Writer};

impl Encode for Type {
    fn encode_into(&self, out: &mut Writer) {
        match self {
            Type::Atomic(symbol) => {
                out.header("t.atomic");
                out.char(*symbol);
            }
            Type::Var(TypeVar(symbol)) => {
                out.header("t.var");
                out.char(*symbol);
            }
            Type::Composite(domain, range) => {
                out.header("t.composite");
                domain.encode_into(out);
                range.encode_into(out);
            }
            Type::Product(subtypes) => {
                out.header("t.product");
                out.list(subtypes);
            }
        }
    }
}

impl Decode for Type {
    fn decode_from(input: &mut Reader) -> Result<Self, CodecError> {
        let header = input.header()?;
        match header.tag.as_str() {
            "t.atomic" => Ok(Type::Atomic(input.char()?)),
            "t.var" => Ok(Type::var(input.char()?)),
            "t.composite" => {
                let domain = Type::decode_from(input)?;
                let range = Type::decode_from(input)?;
                Ok(Type::composite(domain, range))
            }
            "t.product" => {
                let subtypes: Vec<Type> = input.list()?;
                if subtypes.len() < 2 {
                    return Err(CodecError::invalid(
                        format!("product of {} subtype(s)", subtypes.len()),
                        header.offset,
                    ));
                }
                Ok(Type::product(subtypes))
            }
            _ => Err(header.unknown()),
        }
    }
}
