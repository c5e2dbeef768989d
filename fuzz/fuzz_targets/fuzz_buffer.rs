#![no_main]
//! Differential fuzzing of `CursorBuffer` against a flat `Vec<u8>` model.
//!
//! The model mirrors the buffer contract: writes grow the store to
//! `offset + n`, reads clamp an overrun cursor and stop at the logical end,
//! and end-relative seeks take a backward distance.

use arbitrary::Arbitrary;
use bytecursor::{CursorBuffer, Whence};
use libfuzzer_sys::fuzz_target;

const MAX_CHUNK: usize = 1 << 12;

#[derive(Arbitrary, Debug)]
enum Op {
    Write(Vec<u8>),
    WriteAt(Vec<u8>, u16),
    Read(u16),
    ReadAt(u16, u16),
    Seek(i32, u8),
    Reset,
}

struct Model {
    data: Vec<u8>,
    offset: usize,
}

impl Model {
    fn write_at(&mut self, src: &[u8], offset: usize) {
        let end = offset + src.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[offset..end].copy_from_slice(src);
    }

    fn read_at(&self, dst: &mut [u8], offset: usize) -> usize {
        if offset >= self.data.len() {
            return 0;
        }
        let n = dst.len().min(self.data.len() - offset);
        dst[..n].copy_from_slice(&self.data[offset..offset + n]);
        n
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let buf = CursorBuffer::new("fuzz");
    let mut model = Model {
        data: Vec::new(),
        offset: 0,
    };

    for op in ops {
        match op {
            Op::Write(chunk) => {
                let chunk = &chunk[..chunk.len().min(MAX_CHUNK)];
                let n = buf.write(chunk).unwrap();
                assert_eq!(n, chunk.len());
                model.write_at(chunk, model.offset);
                model.offset += n;
            }
            Op::WriteAt(chunk, offset) => {
                let chunk = &chunk[..chunk.len().min(MAX_CHUNK)];
                let n = buf.write_at(chunk, usize::from(offset)).unwrap();
                assert_eq!(n, chunk.len());
                model.write_at(chunk, usize::from(offset));
            }
            Op::Read(len) => {
                let mut got = vec![0u8; usize::from(len).min(MAX_CHUNK)];
                let mut want = got.clone();
                let n = buf.read(&mut got).unwrap();
                // Reads clamp an overrun cursor back to the logical end.
                model.offset = model.offset.min(model.data.len());
                let m = model.read_at(&mut want, model.offset);
                model.offset += m;
                assert_eq!(n, m);
                assert_eq!(got[..n], want[..m]);
            }
            Op::ReadAt(len, offset) => {
                let mut got = vec![0u8; usize::from(len).min(MAX_CHUNK)];
                let mut want = got.clone();
                let n = buf.read_at(&mut got, usize::from(offset)).unwrap();
                let m = model.read_at(&mut want, usize::from(offset));
                assert_eq!(n, m);
                assert_eq!(got[..n], want[..m]);
            }
            Op::Seek(to, whence) => {
                let whence = match whence % 3 {
                    0 => Whence::Start,
                    1 => Whence::Current,
                    _ => Whence::End,
                };
                let to = i64::from(to);
                let target = match whence {
                    Whence::Start => to,
                    Whence::Current => i64::try_from(model.offset).unwrap() + to,
                    Whence::End => i64::try_from(model.data.len()).unwrap() - to,
                };
                match buf.seek(to, whence) {
                    Ok(offset) => {
                        assert_eq!(i64::try_from(offset).unwrap(), target);
                        model.offset = offset;
                    }
                    Err(_) => assert!(target < 0),
                }
            }
            Op::Reset => {
                buf.reset().unwrap();
                model.data.clear();
                model.offset = 0;
            }
        }
    }

    assert_eq!(buf.bytes(), model.data);
    assert_eq!(buf.size(), model.data.len());
});
