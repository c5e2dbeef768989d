//! End-to-end coverage of the parent/reference aliasing protocol.

use std::thread;

use bytecursor::{CursorBuffer, Error, Whence};

#[test]
fn reference_write_is_visible_to_root() {
    let root = CursorBuffer::from_slices("shared", &[b"....."]);
    let view = root.reference();

    assert_eq!(view.write(b"ab").unwrap(), 2);

    let mut head = [0u8; 2];
    assert_eq!(root.read(&mut head).unwrap(), 2);
    assert_eq!(&head, b"ab");
    assert_eq!(root.bytes(), b"ab...");
}

#[test]
fn cursors_are_independent() {
    let root = CursorBuffer::from_slices("cursors", &[b"abcdef"]);
    let a = root.reference();
    let b = root.reference();

    let mut one = [0u8; 1];
    a.read(&mut one).unwrap();
    a.read(&mut one).unwrap();
    assert_eq!(one, [b'b']);

    // Sibling and root cursors never moved.
    b.read(&mut one).unwrap();
    assert_eq!(one, [b'a']);
    root.read(&mut one).unwrap();
    assert_eq!(one, [b'a']);
}

#[test]
fn references_chain_to_one_root() {
    let root = CursorBuffer::new("chain");
    let mid = root.reference();
    let leaf = mid.reference();

    leaf.write(b"deep").unwrap();
    assert_eq!(root.bytes(), b"deep");
    assert_eq!(mid.size(), 4);

    // Growth through the leaf is observed by every level.
    leaf.write(b"er").unwrap();
    assert_eq!(root.size(), 6);
    assert_eq!(mid.size(), 6);
}

#[test]
fn sibling_growth_is_observed_through_size() {
    let root = CursorBuffer::new("grow");
    let a = root.reference();
    let b = root.reference();

    a.write(&[7u8; 32]).unwrap();
    assert_eq!(b.size(), 32);
    assert_eq!(b.bytes().len(), 32);
}

#[test]
fn disjoint_range_writers_do_not_corrupt_each_other() {
    const HALF: usize = 4096;

    let root = CursorBuffer::new("contended");
    let low = root.reference();
    let high = root.reference();

    let writer = |buf: CursorBuffer, base: usize, fill: u8| {
        thread::spawn(move || {
            // One byte at a time to maximize interleaving.
            for i in 0..HALF {
                buf.write_at(&[fill], base + i).unwrap();
            }
        })
    };

    let t_low = writer(low, 0, 0xAA);
    let t_high = writer(high, HALF, 0xBB);
    t_low.join().unwrap();
    t_high.join().unwrap();

    let bytes = root.bytes();
    assert_eq!(bytes.len(), 2 * HALF);
    assert!(bytes[..HALF].iter().all(|&b| b == 0xAA));
    assert!(bytes[HALF..].iter().all(|&b| b == 0xBB));
}

#[test]
fn copy_is_fully_decoupled() {
    let original = CursorBuffer::from_slices("orig", &[b"state"]);
    let copy = original.clone();

    original.write_at(b"X", 0).unwrap();
    assert_eq!(copy.bytes(), b"state");

    copy.write_at(b"Y", 4).unwrap();
    assert_eq!(original.bytes(), b"Xtate");
    assert_eq!(copy.bytes(), b"statY");
    assert_eq!(copy.name(), "orig");
}

#[test]
fn closing_a_reference_cascades_to_every_alias() {
    let root = CursorBuffer::new("doomed");
    let a = root.reference();
    let b = root.reference();

    a.close().unwrap();

    assert!(root.is_closed());
    assert!(a.is_closed());
    assert!(b.is_closed());

    let mut probe = [0u8; 1];
    assert!(matches!(root.read(&mut probe), Err(Error::Closed)));
    assert!(matches!(b.write(b"late"), Err(Error::Closed)));
    assert!(matches!(b.seek(0, Whence::Start), Err(Error::Closed)));

    // Close stays idempotent after the cascade.
    b.close().unwrap();
}

#[test]
fn reset_through_a_reference_clears_the_root() {
    let root = CursorBuffer::from_slices("reset", &[b"payload"]);
    root.seek(3, Whence::Start).unwrap();
    let view = root.reference();
    view.write(b"zz").unwrap();

    view.reset().unwrap();

    assert_eq!(root.size(), 0);
    assert_eq!(view.size(), 0);
    assert!(root.bytes().is_empty());
    // The root's cursor was zeroed by the cascade as well.
    assert_eq!(root.seek(0, Whence::Current).unwrap(), 0);
}

#[test]
fn reference_inherits_the_name() {
    let root = CursorBuffer::new("label");
    assert_eq!(root.name(), "label");
    assert_eq!(root.reference().name(), "label");
}
