use rstest::rstest;

use crate::{CursorBuffer, Error, Whence};

/// Buffer of 10 bytes with the cursor parked at 4.
fn fixture() -> CursorBuffer {
    let buf = CursorBuffer::from_slices("seek", &[b"0123456789"]);
    buf.seek(4, Whence::Start).unwrap();
    buf
}

#[rstest]
#[case(7, Whence::Start, 7)]
#[case(0, Whence::Start, 0)]
#[case(3, Whence::Current, 7)]
#[case(-3, Whence::Current, 1)]
#[case(-4, Whence::Current, 0)]
// `End` takes a backward distance: offset becomes `length - to`.
#[case(4, Whence::End, 6)]
#[case(0, Whence::End, 10)]
#[case(10, Whence::End, 0)]
#[case(-2, Whence::End, 12)]
fn seek_resolves_offset(#[case] to: i64, #[case] whence: Whence, #[case] want: usize) {
    let buf = fixture();
    assert_eq!(buf.seek(to, whence).unwrap(), want);
    // The resulting cursor is observable through a no-op relative seek.
    assert_eq!(buf.seek(0, Whence::Current).unwrap(), want);
}

#[rstest]
#[case(-1, Whence::Start)]
#[case(-5, Whence::Current)]
#[case(11, Whence::End)]
fn negative_offset_fails_without_moving(#[case] to: i64, #[case] whence: Whence) {
    let buf = fixture();
    assert!(matches!(buf.seek(to, whence), Err(Error::Seek(_))));
    assert_eq!(buf.seek(0, Whence::Current).unwrap(), 4);
}

#[test]
fn seek_on_reference_tracks_root_growth() {
    let root = CursorBuffer::new("growing");
    let view = root.reference();

    root.write(&[0u8; 8]).unwrap();

    // The reference refreshes its length from the root before resolving an
    // end-relative seek.
    assert_eq!(view.seek(0, Whence::End).unwrap(), 8);
    assert_eq!(view.seek(3, Whence::End).unwrap(), 5);
}

#[test]
fn seek_past_end_is_allowed_until_read() {
    let buf = CursorBuffer::from_slices("overrun", &[b"abc"]);
    assert_eq!(buf.seek(10, Whence::Start).unwrap(), 10);

    // Reading clamps the overrun cursor back to the logical end.
    let mut probe = [0u8; 1];
    assert_eq!(buf.read(&mut probe).unwrap(), 0);
    assert_eq!(buf.seek(0, Whence::Current).unwrap(), 3);
}
