pub mod align;
pub mod error;
pub mod parse;
pub mod subst;
pub mod ty;

pub use align::{align_types, aligned_type};
pub use error::TypeError;
pub use parse::{parse_type, parse_type_prefix};
pub use subst::TypeSubstitution;
pub use ty::{E, N, S, T, Type, TypeVar};
