use std::io;

use thiserror::Error;

/// Alias for results produced by buffer and encoder operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by [`CursorBuffer`](crate::CursorBuffer) operations.
///
/// End-of-data is deliberately absent: reads signal exhaustion by returning
/// `Ok(0)`, matching the `std::io::Read` convention.
#[derive(Error, Debug)]
pub enum Error {
    /// The buffer, or the root it resolves to, has been closed.
    #[error("buffer is closed")]
    Closed,
    /// A seek resolved to a position before the start of the buffer.
    #[error("seek resolves to offset {0}, before the start of the buffer")]
    Seek(i128),
    /// A readable source handed to the encoder failed while being drained.
    #[error("failed to drain source stream: {0}")]
    Source(#[from] io::Error),
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Closed => io::Error::new(io::ErrorKind::NotConnected, err),
            Error::Seek(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            Error::Source(inner) => inner,
        }
    }
}
