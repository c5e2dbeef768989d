//! Typed value encoding onto a cursor buffer.
//!
//! [`Encodable`] is a closed set of input shapes that
//! [`CursorBuffer::write_abstract`] serializes into little-endian byte
//! sequences. The set replaces an open-ended "any value" surface with
//! explicit variants plus `From` conversions, so call sites keep the same
//! ergonomics (`buf.write_abstract(7u32)`) while unsupported shapes are
//! rejected at compile time.

use std::io;

use crate::buffer::CursorBuffer;
use crate::error::{Error, Result};

/// Capability for values that can produce their own byte representation,
/// such as another buffer.
pub trait ToBytes {
    /// The value's byte representation, written verbatim when encoded.
    fn to_bytes(&self) -> Vec<u8>;
}

impl ToBytes for CursorBuffer {
    fn to_bytes(&self) -> Vec<u8> {
        self.bytes()
    }
}

/// One value accepted by [`CursorBuffer::write_abstract`].
///
/// Fixed-width numerics encode little-endian; sequences concatenate their
/// elements' encodings in order with no separators.
pub enum Encodable<'a> {
    /// A single byte, written as-is.
    Byte(u8),
    /// One byte: 1 for true, 0 for false.
    Bool(bool),
    /// Machine-word signed integer, truncated to its low 8 bits.
    Int(isize),
    /// Machine-word unsigned integer, truncated to its low 8 bits.
    Uint(usize),
    /// Raw bytes, written verbatim.
    Bytes(&'a [u8]),
    /// UTF-8 text, written verbatim.
    Str(&'a str),
    /// Each string's bytes concatenated in order, no separators.
    Strings(&'a [&'a str]),
    /// 16-bit signed integer, little-endian.
    I16(i16),
    /// 16-bit unsigned integer, little-endian.
    U16(u16),
    /// 32-bit signed integer, little-endian.
    I32(i32),
    /// 32-bit unsigned integer, little-endian.
    U32(u32),
    /// 64-bit signed integer, little-endian.
    I64(i64),
    /// 64-bit unsigned integer, little-endian.
    U64(u64),
    /// 32-bit float, little-endian.
    F32(f32),
    /// 64-bit float, little-endian.
    F64(f64),
    /// Slice of 16-bit signed integers, each little-endian.
    I16Seq(&'a [i16]),
    /// Slice of 16-bit unsigned integers, each little-endian.
    U16Seq(&'a [u16]),
    /// Slice of 32-bit signed integers, each little-endian.
    I32Seq(&'a [i32]),
    /// Slice of 32-bit unsigned integers, each little-endian.
    U32Seq(&'a [u32]),
    /// Slice of 64-bit signed integers, each little-endian.
    I64Seq(&'a [i64]),
    /// Slice of 64-bit unsigned integers, each little-endian.
    U64Seq(&'a [u64]),
    /// Slice of 32-bit floats, each little-endian.
    F32Seq(&'a [f32]),
    /// Slice of 64-bit floats, each little-endian.
    F64Seq(&'a [f64]),
    /// A value producing its own bytes, written verbatim.
    Source(&'a dyn ToBytes),
    /// A readable stream, fully drained and then written verbatim.
    Reader(&'a mut dyn io::Read),
}

impl<'a> Encodable<'a> {
    /// Wrap a byte-producing value.
    pub fn source(value: &'a dyn ToBytes) -> Self {
        Encodable::Source(value)
    }

    /// Wrap a readable stream; encoding drains it to exhaustion.
    pub fn reader(value: &'a mut dyn io::Read) -> Self {
        Encodable::Reader(value)
    }

    /// Append this value's encoding to `out`.
    fn encode_into(self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Encodable::Byte(v) => out.push(v),
            Encodable::Bool(v) => out.push(u8::from(v)),
            Encodable::Int(v) => out.push(v.to_le_bytes()[0]),
            Encodable::Uint(v) => out.push(v.to_le_bytes()[0]),
            Encodable::Bytes(v) => out.extend_from_slice(v),
            Encodable::Str(v) => out.extend_from_slice(v.as_bytes()),
            Encodable::Strings(list) => {
                for s in list {
                    out.extend_from_slice(s.as_bytes());
                }
            }
            Encodable::I16(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::F32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::F64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Encodable::I16Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::U16Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::I32Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::U32Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::I64Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::U64Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::F32Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::F64Seq(list) => encode_seq(list, out, |v| v.to_le_bytes()),
            Encodable::Source(src) => out.extend_from_slice(&src.to_bytes()),
            Encodable::Reader(r) => {
                r.read_to_end(out).map_err(Error::Source)?;
            }
        }
        Ok(())
    }
}

fn encode_seq<T: Copy, const N: usize>(
    list: &[T],
    out: &mut Vec<u8>,
    to_le: impl Fn(T) -> [u8; N],
) {
    out.reserve(list.len() * N);
    for &v in list {
        out.extend_from_slice(&to_le(v));
    }
}

macro_rules! encodable_from {
    ($($ty:ty => $scalar:ident / $seq:ident),* $(,)?) => {$(
        impl From<$ty> for Encodable<'_> {
            fn from(v: $ty) -> Self {
                Encodable::$scalar(v)
            }
        }

        impl<'a> From<&'a [$ty]> for Encodable<'a> {
            fn from(v: &'a [$ty]) -> Self {
                Encodable::$seq(v)
            }
        }
    )*};
}

encodable_from! {
    i16 => I16 / I16Seq,
    u16 => U16 / U16Seq,
    i32 => I32 / I32Seq,
    u32 => U32 / U32Seq,
    i64 => I64 / I64Seq,
    u64 => U64 / U64Seq,
    f32 => F32 / F32Seq,
    f64 => F64 / F64Seq,
}

impl From<u8> for Encodable<'_> {
    fn from(v: u8) -> Self {
        Encodable::Byte(v)
    }
}

impl From<bool> for Encodable<'_> {
    fn from(v: bool) -> Self {
        Encodable::Bool(v)
    }
}

impl From<isize> for Encodable<'_> {
    fn from(v: isize) -> Self {
        Encodable::Int(v)
    }
}

impl From<usize> for Encodable<'_> {
    fn from(v: usize) -> Self {
        Encodable::Uint(v)
    }
}

impl<'a> From<&'a [u8]> for Encodable<'a> {
    fn from(v: &'a [u8]) -> Self {
        Encodable::Bytes(v)
    }
}

impl<'a> From<&'a str> for Encodable<'a> {
    fn from(v: &'a str) -> Self {
        Encodable::Str(v)
    }
}

impl<'a> From<&'a [&'a str]> for Encodable<'a> {
    fn from(v: &'a [&'a str]) -> Self {
        Encodable::Strings(v)
    }
}

impl<'a> From<&'a CursorBuffer> for Encodable<'a> {
    fn from(v: &'a CursorBuffer) -> Self {
        Encodable::Source(v)
    }
}

impl CursorBuffer {
    /// Encode `value` and append it at this buffer's cursor with a single
    /// [`write`] call.
    ///
    /// The full byte sequence is assembled in a scratch buffer first, so
    /// storage growth is one event per call rather than one per element.
    /// Returns the number of bytes written.
    ///
    /// ```rust
    /// use bytecursor::CursorBuffer;
    ///
    /// let buf = CursorBuffer::new("frame");
    /// buf.write_abstract("AB").unwrap();
    /// buf.write_abstract(1u16).unwrap();
    /// assert_eq!(buf.bytes(), [0x41, 0x42, 0x01, 0x00]);
    /// ```
    ///
    /// [`write`]: CursorBuffer::write
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] if the buffer is closed (nothing is drained or
    /// written), or [`Error::Source`] if a [`Encodable::Reader`] input fails
    /// while being drained (nothing is written).
    pub fn write_abstract<'a>(&self, value: impl Into<Encodable<'a>>) -> Result<usize> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let mut scratch = Vec::new();
        value.into().encode_into(&mut scratch)?;
        self.write(&scratch)
    }
}
