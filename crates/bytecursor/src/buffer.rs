//! The cursor buffer: shared growable storage behind independent cursors.

use std::fmt;
use std::io;
use std::sync::Arc;

use bstr::BStr;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::store::ByteStore;

/// Origin for [`CursorBuffer::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Seek to an absolute offset from the start.
    Start,
    /// Seek relative to the current cursor.
    Current,
    /// Seek to a *backward distance* from the logical end: the resulting
    /// offset is `length - to`, not `length + to`.
    End,
}

/// A growable byte buffer with a private read/write cursor.
///
/// A `CursorBuffer` is either a **root**, which exclusively owns a
/// [`ByteStore`], or a **reference** created by [`reference`], which holds no
/// storage and delegates every storage-level operation to its parent while
/// keeping its own cursor. Chains of references always bottom out at exactly
/// one root, and all storage operations execute against that root's store.
///
/// Every public operation acquires an exclusive per-instance lock for the
/// duration of the call. A reference releases its own lock before delegating
/// into the parent, so no two locks are ever held at once and the acyclic
/// parent chain cannot deadlock.
///
/// [`reference`]: CursorBuffer::reference
pub struct CursorBuffer {
    shared: Arc<Mutex<State>>,
}

struct State {
    name: String,
    backing: Backing,
    /// Valid byte extent. For a root this is refreshed from the store's
    /// capacity before any bound check, because sibling references may have
    /// grown the shared store since the last call on this instance.
    length: usize,
    /// This instance's cursor, never shared with any other instance.
    offset: usize,
    closed: bool,
}

enum Backing {
    Root(ByteStore),
    Reference(CursorBuffer),
}

impl State {
    fn parent(&self) -> Option<CursorBuffer> {
        match &self.backing {
            Backing::Root(_) => None,
            Backing::Reference(parent) => Some(parent.handle()),
        }
    }

    fn store(&self) -> &ByteStore {
        match &self.backing {
            Backing::Root(store) => store,
            Backing::Reference(_) => unreachable!("reference buffers hold no storage"),
        }
    }

    fn store_mut(&mut self) -> &mut ByteStore {
        match &mut self.backing {
            Backing::Root(store) => store,
            Backing::Reference(_) => unreachable!("reference buffers hold no storage"),
        }
    }

    fn refresh_length(&mut self) {
        self.length = self.store().capacity();
    }

    /// Root-side read at an explicit offset. Touches no cursor.
    fn read_root_at(&mut self, dst: &mut [u8], offset: usize) -> usize {
        self.refresh_length();
        self.store().read_range(offset, dst)
    }

    /// Root-side growth-then-write at an explicit offset. Touches no cursor.
    /// Growth is atomic with the write: both happen inside the caller's
    /// critical section on this instance.
    fn write_root_at(&mut self, src: &[u8], offset: usize) -> usize {
        self.refresh_length();
        let end = offset + src.len();
        if end > self.length {
            let growth = end - self.length;
            self.store_mut().grow(growth);
            self.length = end;
        }
        self.store_mut().write_range(offset, src);
        src.len()
    }
}

impl CursorBuffer {
    /// Create an empty root buffer.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_slices(name, &[])
    }

    /// Create a root buffer pre-seeded with the given slices, concatenated
    /// in order. The logical length equals the sum of the slice lengths.
    #[must_use]
    pub fn from_slices(name: impl Into<String>, slices: &[&[u8]]) -> Self {
        let store = ByteStore::from_slices(slices);
        let length = store.capacity();
        Self {
            shared: Arc::new(Mutex::new(State {
                name: name.into(),
                backing: Backing::Root(store),
                length,
                offset: 0,
                closed: false,
            })),
        }
    }

    /// A second handle to the same instance (same cursor, same lock).
    /// Private on purpose: the public aliasing surface is [`reference`],
    /// which always creates an instance with its own cursor.
    ///
    /// [`reference`]: CursorBuffer::reference
    fn handle(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Create a reference buffer that aliases this buffer's storage.
    ///
    /// The reference shares bytes with the root this buffer resolves to, but
    /// has its own cursor starting at 0 and its own lock. No data is copied.
    /// References may be taken from references; the chain always resolves to
    /// one root.
    ///
    /// ```rust
    /// use bytecursor::CursorBuffer;
    ///
    /// let root = CursorBuffer::from_slices("shared", &[b"abc"]);
    /// let view = root.reference();
    /// view.write_at(b"x", 1).unwrap();
    /// assert_eq!(root.bytes(), b"axc");
    /// ```
    #[must_use]
    pub fn reference(&self) -> Self {
        let name = self.shared.lock().name.clone();
        Self {
            shared: Arc::new(Mutex::new(State {
                name,
                backing: Backing::Reference(self.handle()),
                length: 0,
                offset: 0,
                closed: false,
            })),
        }
    }

    /// Fill as much of `dst` as is available at this buffer's cursor and
    /// advance the cursor by the number of bytes read.
    ///
    /// Returns `Ok(0)` once nothing further is available; exhaustion is not
    /// an error. A reference reads through its parent at the reference's own
    /// cursor and never moves the parent's.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] if this buffer or its root has been closed.
    pub fn read(&self, dst: &mut [u8]) -> Result<usize> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let (parent, offset) = {
            let mut state = self.shared.lock();
            let Some(parent) = state.parent() else {
                // Root: clamp an overrun cursor back to the logical end,
                // then hand out whatever remains.
                state.refresh_length();
                if state.offset > state.length {
                    state.offset = state.length;
                }
                let offset = state.offset;
                let n = state.read_root_at(dst, offset);
                state.offset += n;
                return Ok(n);
            };
            (parent, state.offset)
        };
        let n = parent.read_at(dst, offset)?;
        self.shared.lock().offset += n;
        Ok(n)
    }

    /// Read at an explicit offset without touching any cursor.
    ///
    /// Returns `Ok(0)` when nothing is available at `offset`; deciding
    /// whether that means end-of-data is the caller's responsibility.
    /// References forward up the parent chain to the root.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] if this buffer or its root has been closed.
    pub fn read_at(&self, dst: &mut [u8], offset: usize) -> Result<usize> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let parent = {
            let mut state = self.shared.lock();
            let Some(parent) = state.parent() else {
                return Ok(state.read_root_at(dst, offset));
            };
            parent
        };
        parent.read_at(dst, offset)
    }

    /// Write `src` at this buffer's cursor, growing the shared storage as
    /// needed, and advance the cursor by `src.len()`.
    ///
    /// A reference writes through its parent at the reference's own cursor;
    /// the parent's cursor is untouched.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] if this buffer or its root has been closed.
    pub fn write(&self, src: &[u8]) -> Result<usize> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let (parent, offset) = {
            let mut state = self.shared.lock();
            let Some(parent) = state.parent() else {
                let offset = state.offset;
                let n = state.write_root_at(src, offset);
                state.offset += n;
                return Ok(n);
            };
            (parent, state.offset)
        };
        let n = parent.write_at(src, offset)?;
        self.shared.lock().offset += n;
        Ok(n)
    }

    /// Write `src` at an explicit offset without touching any cursor,
    /// growing the shared storage as needed.
    ///
    /// This is the primitive that lets a reference mutate shared storage at
    /// a position independent of its own or the root's cursor.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] if this buffer or its root has been closed.
    pub fn write_at(&self, src: &[u8], offset: usize) -> Result<usize> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let parent = {
            let mut state = self.shared.lock();
            let Some(parent) = state.parent() else {
                return Ok(state.write_root_at(src, offset));
            };
            parent
        };
        parent.write_at(src, offset)
    }

    /// Reposition this buffer's cursor and return the resulting offset.
    ///
    /// [`Whence::End`] interprets `to` as a backward distance from the
    /// logical end: the new offset is `length - to`. On a root the store's
    /// native cursor is repositioned as well; on a reference only the local
    /// cursor moves, since shared storage has no single authoritative cursor.
    ///
    /// # Errors
    ///
    /// [`Error::Seek`] if the computed offset is negative (the cursor is
    /// left unchanged), or [`Error::Closed`] after close.
    pub fn seek(&self, to: i64, whence: Whence) -> Result<usize> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let parent = { self.shared.lock().parent() };
        if let Some(parent) = parent {
            // The root may have grown through a sibling; refresh before
            // computing an end-relative position.
            let length = parent.size();
            let mut state = self.shared.lock();
            state.length = length;
            let offset = resolve_offset(to, whence, state.offset, state.length)?;
            state.offset = offset;
            Ok(offset)
        } else {
            let mut state = self.shared.lock();
            state.refresh_length();
            let offset = resolve_offset(to, whence, state.offset, state.length)?;
            state.offset = offset;
            state.store_mut().set_position(offset);
            Ok(offset)
        }
    }

    /// Mark this buffer closed. Closing a reference also closes its parent,
    /// cascading to the root, so every buffer sharing that storage fails
    /// subsequent I/O with [`Error::Closed`]. Idempotent.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` mirrors the close contract of
    /// stream-style resources.
    pub fn close(&self) -> Result<()> {
        let parent = {
            let mut state = self.shared.lock();
            state.closed = true;
            state.parent()
        };
        if let Some(parent) = parent {
            parent.close()?;
        }
        Ok(())
    }

    /// Whether this buffer is closed. A reference reports closed if either
    /// its own flag or any ancestor's flag is set.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        let parent = {
            let state = self.shared.lock();
            if state.closed {
                return true;
            }
            state.parent()
        };
        match parent {
            Some(parent) => parent.is_closed(),
            None => false,
        }
    }

    /// Zero this buffer's cursor and length. A reference also resets its
    /// parent, cascading to the root; the root additionally clears the
    /// backing store's contents and capacity.
    ///
    /// # Errors
    ///
    /// [`Error::Closed`] if this buffer or its root has been closed.
    pub fn reset(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let parent = {
            let mut state = self.shared.lock();
            state.offset = 0;
            state.length = 0;
            match &mut state.backing {
                Backing::Root(store) => {
                    store.reset();
                    None
                }
                Backing::Reference(parent) => Some(parent.handle()),
            }
        };
        if let Some(parent) = parent {
            parent.reset()?;
        }
        Ok(())
    }

    /// Current logical length, refreshed from the root's storage capacity.
    ///
    /// This refresh is the synchronization point that lets one reference
    /// observe growth performed by a sibling reference or by the root.
    #[must_use]
    pub fn size(&self) -> usize {
        let parent = {
            let mut state = self.shared.lock();
            let Some(parent) = state.parent() else {
                state.refresh_length();
                return state.length;
            };
            parent
        };
        let length = parent.size();
        self.shared.lock().length = length;
        length
    }

    /// Full current contents of the resolved root's storage.
    ///
    /// Never scoped to this instance's cursor: references see the entire
    /// shared buffer, not a sub-range.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        let parent = {
            let state = self.shared.lock();
            let Some(parent) = state.parent() else {
                return state.store().as_slice().to_vec();
            };
            parent
        };
        parent.bytes()
    }

    /// The caller-assigned label. Has no effect on I/O.
    #[must_use]
    pub fn name(&self) -> String {
        self.shared.lock().name.clone()
    }
}

fn resolve_offset(to: i64, whence: Whence, current: usize, length: usize) -> Result<usize> {
    let target = match whence {
        Whence::Start => i128::from(to),
        Whence::Current => current as i128 + i128::from(to),
        // Backward distance from the end, kept exactly as `length - to`.
        Whence::End => length as i128 - i128::from(to),
    };
    usize::try_from(target).map_err(|_| Error::Seek(target))
}

/// Deep copy: a new root over a freshly allocated store snapshotted from the
/// source's full current bytes, with the cursor at 0. The two buffers are
/// fully decoupled afterwards. For an aliasing view, use
/// [`CursorBuffer::reference`] instead.
impl Clone for CursorBuffer {
    fn clone(&self) -> Self {
        let name = self.name();
        let bytes = self.bytes();
        Self::from_slices(name, &[&bytes])
    }
}

/// Lossy textual view of the full shared contents.
impl fmt::Display for CursorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.bytes();
        BStr::new(&bytes).fmt(f)
    }
}

impl fmt::Debug for CursorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        let kind = match &state.backing {
            Backing::Root(_) => "root",
            Backing::Reference(_) => "reference",
        };
        f.debug_struct("CursorBuffer")
            .field("name", &state.name)
            .field("kind", &kind)
            .field("length", &state.length)
            .field("offset", &state.offset)
            .field("closed", &state.closed)
            .finish()
    }
}

impl io::Read for CursorBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        CursorBuffer::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Write for CursorBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        CursorBuffer::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Writes land in the shared store immediately.
        Ok(())
    }
}

/// `SeekFrom::End(n)` maps to the backward-distance arithmetic of
/// [`Whence::End`]: the resulting offset is `length - n`.
impl io::Seek for CursorBuffer {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (to, whence) = match pos {
            io::SeekFrom::Start(p) => (
                i64::try_from(p).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset out of range")
                })?,
                Whence::Start,
            ),
            io::SeekFrom::Current(d) => (d, Whence::Current),
            io::SeekFrom::End(d) => (d, Whence::End),
        };
        let offset = CursorBuffer::seek(self, to, whence)?;
        Ok(offset as u64)
    }
}
