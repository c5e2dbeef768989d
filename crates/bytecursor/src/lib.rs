//! Growable, random-access byte buffers with stream-style sequential I/O
//! and cheap aliasing reference views.
//!
//! The central type is [`CursorBuffer`]: a handle over a growable byte store
//! that exposes `read`/`write`/`seek`/`close` in the shape of the `std::io`
//! traits, while allowing any number of lightweight [references] that share
//! the same storage but keep fully independent cursors.
//!
//! [references]: CursorBuffer::reference
//!
//! ```rust
//! use bytecursor::CursorBuffer;
//!
//! let root = CursorBuffer::new("scratch");
//! root.write(b"hello").unwrap();
//!
//! // A reference aliases the same bytes with its own cursor.
//! let view = root.reference();
//! let mut five = [0u8; 5];
//! assert_eq!(view.read(&mut five).unwrap(), 5);
//! assert_eq!(&five, b"hello");
//!
//! // The root's cursor was never moved by the reference.
//! root.write(b", world").unwrap();
//! assert_eq!(root.bytes(), b"hello, world");
//! ```
//!
//! With the default `encode` feature, [`CursorBuffer::write_abstract`]
//! serializes scalars, strings, slices of fixed-width numerics, and
//! byte-producing values into little-endian byte sequences.

mod buffer;
#[cfg(feature = "encode")]
mod encode;
mod error;
mod store;

#[cfg(test)]
mod tests;

pub use buffer::{CursorBuffer, Whence};
#[cfg(feature = "encode")]
pub use encode::{Encodable, ToBytes};
pub use error::{Error, Result};
pub use store::ByteStore;
