#![no_main]

use arbitrary::Arbitrary;
use bufview::{ALL, Buffer, ByteSet, GrowthOptions, MarkerId, Trailing, ViewId};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Append { view: u8, bytes: Vec<u8> },
    Child { view: u8, len: Option<u8> },
    PeekChild { view: u8 },
    Release { view: u8 },
    Marker { view: u8 },
    ReleaseMarker { marker: u8 },
    ResetTo { view: u8, marker: u8 },
    Advance { view: u8, n: u8 },
    SetPosition { view: u8, pos: u16 },
    NoAdvance { view: u8, on: bool },
    Copy { view: u8, out: u8, len: u8 },
    TakeUntil { view: u8, stop: u8 },
    Parse { view: u8, float: bool, reject: bool },
    Shift { n: u16 },
    Trim,
}

#[derive(Arbitrary, Debug)]
struct Input {
    floor: u8,
    ceiling: u16,
    ops: Vec<Op>,
}

fn pick<T: Copy>(items: &[T], i: u8) -> Option<T> {
    (!items.is_empty()).then(|| items[usize::from(i) % items.len()])
}

fn run(input: Input) {
    let options = GrowthOptions {
        floor: usize::from(input.floor),
        ceiling: usize::from(input.ceiling),
    };
    let Ok(mut buf) = Buffer::growable(options) else {
        return;
    };
    let mut views: Vec<ViewId> = vec![buf.root()];
    let mut markers: Vec<MarkerId> = Vec::new();

    for op in input.ops {
        match op {
            Op::Append { view, bytes } => {
                if let Some(mut v) = pick(&views, view).and_then(|id| buf.view(id)) {
                    let before = v.position();
                    if v.append(&bytes).is_ok() && !v.is_no_advance() {
                        assert_eq!(v.position(), before + bytes.len());
                    }
                }
            }
            Op::Child { view, len } => {
                if let Some(parent) = pick(&views, view) {
                    let child = match len {
                        Some(len) => buf.child_bounded(parent, usize::from(len)),
                        None => buf.child(parent),
                    };
                    views.extend(child);
                }
            }
            Op::PeekChild { view } => {
                if let Some(parent) = pick(&views, view) {
                    views.extend(buf.peek_child(parent));
                }
            }
            Op::Release { view } => {
                if let Some(id) = pick(&views, view) {
                    if buf.release(id).is_ok() && id != buf.root() {
                        views.retain(|&v| v != id);
                        assert!(buf.info(id).is_none());
                    }
                }
            }
            Op::Marker { view } => {
                if let Some(id) = pick(&views, view) {
                    markers.extend(buf.marker(id));
                }
            }
            Op::ReleaseMarker { marker } => {
                if let Some(m) = pick(&markers, marker) {
                    buf.release_marker(m);
                    assert!(buf.marker_position(m).is_none());
                }
            }
            Op::ResetTo { view, marker } => {
                let target = pick(&markers, marker);
                if let (Some(mut v), Some(m)) = (pick(&views, view).and_then(|id| buf.view(id)), target) {
                    v.reset_to(m);
                }
            }
            Op::Advance { view, n } => {
                if let Some(mut v) = pick(&views, view).and_then(|id| buf.view(id)) {
                    let room = v.remaining();
                    assert!(v.advance(usize::from(n)) <= room);
                }
            }
            Op::SetPosition { view, pos } => {
                if let Some(mut v) = pick(&views, view).and_then(|id| buf.view(id)) {
                    v.set_position(usize::from(pos));
                }
            }
            Op::NoAdvance { view, on } => {
                if let Some(mut v) = pick(&views, view).and_then(|id| buf.view(id)) {
                    v.set_no_advance(on);
                }
            }
            Op::Copy { view, out, len } => {
                if let Some(mut v) = pick(&views, view).and_then(|id| buf.view(id)) {
                    let mut out = vec![0xaa; usize::from(out)];
                    let n = v.copy(&mut out, usize::from(len));
                    if n > 0 {
                        assert_eq!(out[n], 0);
                    }
                }
            }
            Op::TakeUntil { view, stop } => {
                if let Some(mut v) = pick(&views, view).and_then(|id| buf.view(id)) {
                    let taken = v.take_until(ALL, &ByteSet::from_bytes(&[stop]));
                    assert!(!taken.contains(&stop));
                }
            }
            Op::Parse { view, float, reject } => {
                if let Some(mut v) = pick(&views, view).and_then(|id| buf.view(id)) {
                    let trailing = if reject { Trailing::Reject } else { Trailing::Allow };
                    let before = v.position();
                    let consumed = if float {
                        v.parse::<f64>(trailing).map(|(_, n)| n)
                    } else {
                        v.parse::<i64>(trailing).map(|(_, n)| n)
                    };
                    match consumed {
                        Ok(n) if !v.is_no_advance() => assert_eq!(v.position(), before + n),
                        Ok(_) => {}
                        Err(_) => assert_eq!(v.position(), before),
                    }
                }
            }
            Op::Shift { n } => {
                let len = buf.len();
                assert!(buf.shift(usize::from(n)) <= len);
            }
            Op::Trim => {
                let _ = buf.trim();
            }
        }

        if let Err(msg) = buf.check_invariants() {
            panic!("{msg}");
        }
    }
}

fuzz_target!(|input: Input| run(input));
