//! Quoting rules for escaped printing.
//!
//! With no quote character input is copied verbatim. With one, the escape
//! character `\`, the quote itself, and anything unprintable are escaped:
//!
//! | input                             | output          |
//! |-----------------------------------|-----------------|
//! | `\`                               | `\\`            |
//! | the quote `q`                     | `\q`            |
//! | newline, carriage return, tab     | `\n`, `\r`, `\t`|
//! | other bytes below `0x20`, `0x7f`  | `\ooo` (octal)  |
//! | each byte of invalid UTF-8        | `\ooo` (octal)  |
//!
//! Valid multi-byte UTF-8 is copied through unchanged.

use bstr::BString;

fn octal(b: u8) -> [u8; 4] {
    [b'\\', b'0' + (b >> 6), b'0' + ((b >> 3) & 7), b'0' + (b & 7)]
}

/// Calls `emit` with each piece of the escaped rendering of `input`, in
/// order.
fn walk(input: &[u8], quote: Option<u8>, mut emit: impl FnMut(&[u8])) {
    let Some(quote) = quote else {
        emit(input);
        return;
    };

    let mut rest = input;
    while !rest.is_empty() {
        let (ch, size) = bstr::decode_utf8(rest);
        let (piece, tail) = rest.split_at(size);
        rest = tail;

        if ch.is_none() {
            for &b in piece {
                emit(&octal(b));
            }
            continue;
        }
        if size > 1 {
            emit(piece);
            continue;
        }

        match piece[0] {
            b'\\' => emit(b"\\\\"),
            b if b == quote => emit(&[b'\\', b]),
            b'\n' => emit(b"\\n"),
            b'\r' => emit(b"\\r"),
            b'\t' => emit(b"\\t"),
            b @ (0..0x20 | 0x7f) => emit(&octal(b)),
            _ => emit(piece),
        }
    }
}

/// Exact length of the escaped rendering of `input`.
#[must_use]
pub fn escaped_len(input: &[u8], quote: Option<u8>) -> usize {
    let mut len = 0;
    walk(input, quote, |piece| len += piece.len());
    len
}

/// Writes the escaped rendering of `input` to the front of `out`, returning
/// the number of bytes written.
///
/// `out` must be at least [`escaped_len`] bytes long; anything that does not
/// fit is dropped.
pub fn escape_into(input: &[u8], quote: Option<u8>, out: &mut [u8]) -> usize {
    let mut at = 0;
    walk(input, quote, |piece| {
        let room = out.len() - at;
        let n = piece.len().min(room);
        out[at..at + n].copy_from_slice(&piece[..n]);
        at += n;
    });
    at
}

/// Owned escaped rendering of `input`.
#[must_use]
pub fn escape(input: &[u8], quote: Option<u8>) -> BString {
    let mut out = BString::from(alloc::vec::Vec::with_capacity(escaped_len(input, quote)));
    walk(input, quote, |piece| out.extend_from_slice(piece));
    out
}
