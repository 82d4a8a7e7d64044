use alloc::vec::Vec;

use crate::{Buffer, BufferError, GrowthOptions};

#[test]
fn markers_keep_their_offset_across_reallocation() {
    let mut buf = Buffer::growable(GrowthOptions { floor: 0, ceiling: 50 }).unwrap();
    let root = buf.root();

    buf.root_view().append_str("A").unwrap();
    let m0 = buf.marker(root).unwrap();
    assert_eq!(buf.marker_position(m0), Some(1));

    buf.root_view().append_str("B").unwrap();
    assert_eq!(buf.as_bstr(), "AB");
    assert_eq!(buf.len(), 2);
    assert_eq!(buf.marker_position(m0), Some(1));

    let child = buf.child(root).unwrap();
    assert_eq!(buf.info(child).unwrap().start, 2);
    let m1 = buf.marker(child).unwrap();
    assert_eq!(buf.marker_position(m1), Some(2));

    // Grows 2 -> 4 and moves the parent with the child.
    assert_eq!(buf.view(child).unwrap().append_str("C"), Ok(1));
    assert_eq!(buf.view(child).unwrap().as_bstr(), "C");
    assert_eq!(buf.len(), 4);

    let parent = buf.info(root).unwrap();
    let c = buf.info(child).unwrap();
    assert_eq!(parent.position, c.start + 1);
    assert_eq!(buf.marker_position(m1).unwrap() - c.start, 0);
    assert_eq!(buf.marker_position(m1).unwrap() - parent.start, 2);
    assert_eq!(parent.position, 3);
    buf.check_invariants().unwrap();
}

#[test]
fn release_marker_unlinks_from_middle_of_list() {
    let mut buf = Buffer::from("abcdef");
    let root = buf.root();
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(buf.root_view().marker());
        buf.root_view().advance(1);
    }
    assert_eq!(buf.markers_of(root).collect::<Vec<_>>(), [ids[2], ids[1], ids[0]]);

    assert!(buf.release_marker(ids[1]));
    assert!(!buf.release_marker(ids[1]));
    assert_eq!(buf.markers_of(root).collect::<Vec<_>>(), [ids[2], ids[0]]);
    assert_eq!(buf.marker_position(ids[1]), None);
    assert_eq!(buf.marker_count(), 2);
    buf.check_invariants().unwrap();
}

#[test]
fn reset_to_marker_after_failed_lookahead() {
    let mut buf = Buffer::from("12ab");
    let mut v = buf.root_view();
    let m = v.marker();
    v.skip(&crate::ByteSet::DIGITS);
    assert!(!v.advance_past(b"cd"));
    assert!(v.reset_to(m));
    assert_eq!(v.current(), b"12ab");
}

#[test]
fn release_reparents_children_and_drops_markers() {
    let mut buf = Buffer::from("abcdef");
    let root = buf.root();
    let mid = buf.child(root).unwrap();
    let leaf = buf.child(mid).unwrap();
    let m = buf.marker(mid).unwrap();

    buf.release(mid).unwrap();
    assert!(buf.view(mid).is_none());
    assert_eq!(buf.marker_position(m), None);
    assert_eq!(buf.info(leaf).unwrap().parent, Some(root));
    assert_eq!(buf.view_count(), 2);

    // Releasing twice is harmless, releasing the root is not allowed.
    assert_eq!(buf.release(mid), Ok(()));
    assert_eq!(buf.release(root), Err(BufferError::RootRelease));

    // The leaf's link still propagates, now straight to the root.
    buf.view(leaf).unwrap().advance(2);
    assert_eq!(buf.info(root).unwrap().position, 2);
    buf.check_invariants().unwrap();
}

#[test]
fn release_of_peek_keeps_grandchildren_from_moving_root() {
    let mut buf = Buffer::from("abcdef");
    let root = buf.root();
    let peek = buf.peek_child(root).unwrap();
    let leaf = buf.child(peek).unwrap();

    buf.view(leaf).unwrap().advance(1);
    assert_eq!(buf.info(peek).unwrap().position, 1);
    assert_eq!(buf.info(root).unwrap().position, 0);

    buf.release(peek).unwrap();
    assert_eq!(buf.info(leaf).unwrap().parent, Some(root));
    buf.view(leaf).unwrap().advance(2);
    assert_eq!(buf.info(leaf).unwrap().position, 3);
    assert_eq!(buf.info(root).unwrap().position, 0);
    buf.check_invariants().unwrap();
}

#[test]
fn stale_handles_do_not_alias_new_views() {
    let mut buf = Buffer::from("abc");
    let root = buf.root();
    let a = buf.child(root).unwrap();
    buf.release(a).unwrap();
    let b = buf.child(root).unwrap();
    assert_ne!(a, b);
    assert!(buf.view(a).is_none());
    assert!(buf.view(b).is_some());
    assert!(buf.marker(a).is_none());
}

#[test]
fn rebase_follows_region_end_only_for_tail_views() {
    let mut buf = Buffer::growable(GrowthOptions::with_floor(8)).unwrap();
    let root = buf.root();
    let bounded = buf.child_bounded(root, 4).unwrap();
    let tail = buf.peek_child(root).unwrap();

    buf.extend(8).unwrap();
    assert_eq!(buf.len(), 16);
    assert_eq!(buf.info(root).unwrap().end, 16);
    assert_eq!(buf.info(tail).unwrap().end, 16);
    assert_eq!(buf.info(bounded).unwrap().end, 4);
    buf.check_invariants().unwrap();
}
