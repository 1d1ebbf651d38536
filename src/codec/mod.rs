//! # Binary Encoding
//!
//! A tagged, versioned binary form for [`Type`](crate::types::Type) and
//! [`Expr`](crate::ast::Expr) trees. Every node is written as
//!
//! ```text
//! tag      u8 length + ASCII name, e.g. "t.composite" or "e.binder"
//! version  u16, big-endian
//! fields   variant-specific, children encoded recursively
//! ```
//!
//! Field primitives: strings are a `u32` byte length plus UTF-8, lists a `u32`
//! count plus their items, flags one byte, characters and indices `u32`. All
//! integers are big-endian.
//!
//! Decoding is strict: unknown tags, versions this build does not read,
//! malformed fields and trailing bytes are all errors. A decoded tree is
//! identical to the encoded one, down to brackets and explicit-type flags.

mod expr;
mod types;

use thiserror::Error;

/// The version written for every tag.
pub const VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("unknown tag '{tag}' at byte {offset}")]
    UnknownTag { tag: String, offset: usize },

    #[error("version {version} of '{tag}' is not supported (at byte {offset})")]
    UnsupportedVersion {
        tag: String,
        version: u16,
        offset: usize,
    },

    #[error("invalid {what} at byte {offset}")]
    Invalid { what: String, offset: usize },

    #[error("{count} byte(s) left over after the encoded value")]
    TrailingBytes { count: usize },
}

impl CodecError {
    fn invalid(what: impl Into<String>, offset: usize) -> Self {
        CodecError::Invalid {
            what: what.into(),
            offset,
        }
    }
}

/// Values with a binary encoding.
pub trait Encode {
    fn encode_into(&self, out: &mut Writer);

    fn encode(&self) -> Vec<u8> {
        let mut out = Writer::default();
        self.encode_into(&mut out);
        out.into_bytes()
    }
}

/// Values that can be read back from their binary encoding.
pub trait Decode: Sized {
    fn decode_from(input: &mut Reader) -> Result<Self, CodecError>;

    /// Decode a value that must take up all of `bytes`.
    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut input = Reader::new(bytes);
        let value = Self::decode_from(&mut input)?;
        input.finish()?;
        Ok(value)
    }
}

#[derive(Debug, Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Start a node: its tag, then [`VERSION`].
    pub fn header(&mut self, tag: &str) {
        debug_assert!(tag.is_ascii() && tag.len() <= u8::MAX as usize);
        self.bytes.push(tag.len() as u8);
        self.bytes.extend_from_slice(tag.as_bytes());
        self.bytes.extend_from_slice(&VERSION.to_be_bytes());
    }

    pub fn flag(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    pub fn u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn char(&mut self, value: char) {
        self.u32(u32::from(value));
    }

    pub fn count(&mut self, len: usize) {
        let len = u32::try_from(len).unwrap_or_else(|_| panic!("{len} items do not fit a u32 length"));
        self.u32(len);
    }

    pub fn str(&mut self, value: &str) {
        self.count(value.len());
        self.bytes.extend_from_slice(value.as_bytes());
    }

    pub fn list<T: Encode>(&mut self, items: &[T]) {
        self.count(items.len());
        for item in items {
            item.encode_into(self);
        }
    }
}

/// A node header as read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub tag: String,
    pub version: u16,
    /// Where the node started.
    pub offset: usize,
}

impl Header {
    pub fn unknown(self) -> CodecError {
        CodecError::UnknownTag {
            tag: self.tag,
            offset: self.offset,
        }
    }
}

#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(CodecError::UnexpectedEnd {
                offset: self.bytes.len(),
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a node header, rejecting versions other than [`VERSION`].
    pub fn header(&mut self) -> Result<Header, CodecError> {
        let offset = self.pos;
        let [len] = self.array::<1>()?;
        let tag = std::str::from_utf8(self.take(usize::from(len))?)
            .map_err(|_| CodecError::invalid("tag", offset))?
            .to_string();
        let version = u16::from_be_bytes(self.array()?);
        if version != VERSION {
            return Err(CodecError::UnsupportedVersion {
                tag,
                version,
                offset,
            });
        }
        Ok(Header {
            tag,
            version,
            offset,
        })
    }

    pub fn flag(&mut self) -> Result<bool, CodecError> {
        let offset = self.pos;
        match self.array::<1>()? {
            [0] => Ok(false),
            [1] => Ok(true),
            _ => Err(CodecError::invalid("flag", offset)),
        }
    }

    pub fn u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub fn char(&mut self) -> Result<char, CodecError> {
        let offset = self.pos;
        char::from_u32(self.u32()?).ok_or_else(|| CodecError::invalid("character", offset))
    }

    pub fn count(&mut self) -> Result<usize, CodecError> {
        let offset = self.pos;
        usize::try_from(self.u32()?).map_err(|_| CodecError::invalid("length", offset))
    }

    pub fn str(&mut self) -> Result<String, CodecError> {
        let offset = self.pos;
        let len = self.count()?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CodecError::invalid("string", offset))
    }

    pub fn list<T: Decode>(&mut self) -> Result<Vec<T>, CodecError> {
        let len = self.count()?;
        // Every item takes at least one byte.
        if len > self.bytes.len() - self.pos {
            return Err(CodecError::UnexpectedEnd {
                offset: self.bytes.len(),
            });
        }
        (0..len).map(|_| T::decode_from(self)).collect()
    }

    /// Fail unless every byte has been read.
    pub fn finish(&self) -> Result<(), CodecError> {
        match self.bytes.len() - self.pos {
            0 => Ok(()),
            count => Err(CodecError::TrailingBytes { count }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut out = Writer::default();
        out.header("t.var");
        out.char('a');
        assert_eq!(
            out.into_bytes(),
            [&[5u8][..], &b"t.var"[..], &[0, 1][..], &[0, 0, 0, b'a'][..]].concat()
        );
    }

    #[test]
    fn test_primitives_read_back() {
        let mut out = Writer::default();
        out.flag(true);
        out.u32(7);
        out.char('λ');
        out.str("y''");
        let bytes = out.into_bytes();

        let mut input = Reader::new(&bytes);
        assert_eq!(input.flag(), Ok(true));
        assert_eq!(input.u32(), Ok(7));
        assert_eq!(input.char(), Ok('λ'));
        assert_eq!(input.str().as_deref(), Ok("y''"));
        assert_eq!(input.finish(), Ok(()));
    }

    #[test]
    fn test_rejects_other_versions() {
        let bytes = [&[5u8][..], &b"t.var"[..], &[0, 2][..]].concat();
        let err = Reader::new(&bytes).header().unwrap_err();
        assert_eq!(
            err,
            CodecError::UnsupportedVersion {
                tag: "t.var".into(),
                version: 2,
                offset: 0
            }
        );
    }

    #[test]
    fn test_truncated_input() {
        let mut input = Reader::new(&[0, 0]);
        assert_eq!(input.u32(), Err(CodecError::UnexpectedEnd { offset: 2 }));
        assert!(matches!(Reader::new(&[2]).flag(), Err(CodecError::Invalid { .. })));
    }

    #[test]
    fn test_oversized_list_length() {
        let mut out = Writer::default();
        out.u32(u32::MAX);
        let bytes = out.into_bytes();
        let result: Result<Vec<crate::types::Type>, _> = Reader::new(&bytes).list();
        assert!(matches!(result, Err(CodecError::UnexpectedEnd { .. })));
    }
}
