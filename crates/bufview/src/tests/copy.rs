use crate::{ALL, Buffer, ByteSet, CopyError};

const IN: &str = "i am a test string";
const IN_LONG: &str = "i am a longer test string";

fn cstr(out: &[u8]) -> &[u8] {
    let nul = out.iter().position(|&b| b == 0).unwrap();
    &out[..nul]
}

#[test]
fn exact_copy_walks_the_input() {
    let mut out = [0u8; 19];
    let mut buf = Buffer::from(IN);
    let mut v = buf.root_view();

    assert_eq!(v.copy_exact(&mut out, 5), Ok(5));
    assert_eq!(cstr(&out), b"i am ");
    assert_eq!(v.current(), b"a test string");

    assert_eq!(v.copy_exact(&mut out, 13), Ok(13));
    assert_eq!(cstr(&out), b"a test string");
    assert_eq!(v.remaining(), 0);

    assert_eq!(
        v.copy_exact(&mut out, 1),
        Err(CopyError::Insufficient {
            requested: 1,
            available: 0
        })
    );
    assert_eq!(v.position(), v.end());
}

#[test]
fn exact_copy_reports_output_shortfall() {
    let mut out = [0u8; 19];
    let mut buf = Buffer::from(IN_LONG);
    let mut v = buf.root_view();

    let err = v.copy_exact(&mut out, ALL).unwrap_err();
    assert_eq!(err.signed(), -7);
    assert_eq!(v.position(), 0);

    let mut empty: [u8; 0] = [];
    let err = v.copy_exact(&mut empty, ALL).unwrap_err();
    assert_eq!(err, CopyError::OutputTooSmall { needed: 26 });
    assert_eq!(v.position(), 0);
}

#[test]
fn exact_copy_to_empty_output_writes_nothing() {
    let mut out = [b'a'; 4];
    let mut buf = Buffer::from(IN);
    let mut v = buf.root_view();
    assert!(v.copy_exact(&mut out[..0], 2).is_err());
    assert_eq!(out[0], b'a');
}

#[test]
fn best_effort_copy_truncates_to_output() {
    let mut out = [0u8; 19];
    let mut buf = Buffer::from(IN);
    let mut v = buf.root_view();
    assert_eq!(v.copy(&mut out, 5), 5);
    assert_eq!(cstr(&out), b"i am ");
    assert_eq!(v.copy(&mut out, 13), 13);
    assert_eq!(v.copy(&mut out, 1), 0);

    let mut buf = Buffer::from(IN_LONG);
    let mut v = buf.root_view();
    assert_eq!(v.copy(&mut out, ALL), 18);
    assert_eq!(cstr(&out), b"i am a longer test");

    v.set_to_start();
    let mut tiny = [b'a'; 1];
    assert_eq!(v.copy(&mut tiny[..0], ALL), 0);
    assert_eq!(tiny[0], b'a');
    assert_eq!(v.position(), 0);
}

#[test]
fn no_advance_copies_without_moving() {
    let mut out = [0u8; 19];
    let mut buf = Buffer::from(IN);
    let mut v = buf.root_view();
    v.set_no_advance(true);

    assert_eq!(v.copy_exact(&mut out, 5), Ok(5));
    assert_eq!(cstr(&out), b"i am ");
    assert_eq!(v.position(), 0);

    // Peek composes with the "all remaining" length.
    assert_eq!(v.copy(&mut out, ALL), 18);
    assert_eq!(v.position(), 0);
}

#[test]
fn filtered_copies_halt_at_class_boundary() {
    let mut out = [0u8; 16];
    let comma = ByteSet::from_bytes(b",");

    let mut buf = Buffer::from("abc,def");
    let mut v = buf.root_view();
    assert_eq!(v.copy_until(&mut out, ALL, &comma), 3);
    assert_eq!(cstr(&out), b"abc");
    assert_eq!(v.peek(), Some(b','));

    let mut buf = Buffer::from("1234x5");
    let mut v = buf.root_view();
    assert_eq!(v.copy_allowed(&mut out, 2, &ByteSet::DIGITS), 2);
    assert_eq!(v.copy_allowed(&mut out, ALL, &ByteSet::DIGITS), 2);
    assert_eq!(cstr(&out), b"34");
    assert_eq!(v.copy_allowed(&mut out, ALL, &ByteSet::DIGITS), 0);
    assert_eq!(v.current(), b"x5");
}

#[test]
fn owned_copies() {
    let mut buf = Buffer::from("key: value, rest");
    let mut v = buf.root_view();
    assert_eq!(v.take_until(ALL, &ByteSet::from_bytes(b":")), "key");
    assert!(v.next_if(b':'));
    v.skip_whitespace();
    assert_eq!(v.take_allowed(ALL, &ByteSet::from_range(b'a', b'z')), "value");
    assert_eq!(
        v.take_exact(100),
        Err(CopyError::Insufficient {
            requested: 100,
            available: 6
        })
    );
    assert_eq!(v.take(2), ", ");
    assert_eq!(v.take_exact(ALL).unwrap(), "rest");
    assert_eq!(v.take(ALL), "");
}
