use crate::{Buffer, GrowthOptions};

#[test]
fn shift_is_bounded_by_nearest_position() {
    let mut buf = Buffer::growable(GrowthOptions::with_floor(16)).unwrap();
    let root = buf.root();
    let reader = buf.peek_child(root).unwrap();
    buf.root_view().append_str("headerbody").unwrap();

    assert!(buf.view(reader).unwrap().advance_past(b"header"));
    let m = buf.marker(reader).unwrap();
    assert_eq!(buf.marker_position(m), Some(6));

    assert_eq!(buf.shift(100), 6);
    assert_eq!(&buf.as_bytes()[..4], b"body");
    assert_eq!(buf.marker_position(m), Some(0));
    assert_eq!(buf.info(root).unwrap().position, 4);
    assert_eq!(buf.info(root).unwrap().shifted, 6);
    assert_eq!(buf.info(reader).unwrap().position, 0);

    // The freed tail is zeroed and can be refilled.
    let len = buf.len();
    assert!(buf.as_bytes()[len - 6..].iter().all(|&b| b == 0));
    buf.tail_mut(2).unwrap().copy_from_slice(b"!!");
    assert_eq!(&buf.as_bytes()[len - 2..], b"!!");

    // Nothing can move past the marker at 0.
    assert_eq!(buf.shift(1), 0);
    buf.check_invariants().unwrap();
}

#[test]
fn const_buffers_refuse_to_shift() {
    let mut buf = Buffer::from("abcdef");
    buf.root_view().advance(3);
    assert_eq!(buf.shift(3), 0);
    assert!(buf.tail_mut(1).is_none());
}

#[test]
fn fixed_shift_keeps_terminator() {
    let mut raw = [0u8; 9];
    let mut buf = Buffer::fixed(&mut raw).unwrap();
    buf.root_view().append_str("abcdefgh").unwrap();
    assert_eq!(buf.shift(5), 5);
    assert_eq!(buf.as_bytes(), b"fgh\0\0\0\0\0");
    assert_eq!(buf.root_view().remaining(), 5);
    buf.check_invariants().unwrap();
}
