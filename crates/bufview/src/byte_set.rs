//! Single-byte character classes used by filtered copies and the scanners.

use core::fmt;

/// A set of byte values, stored as a 256-bit table.
///
/// Used both as an allow-list ([`ViewMut::copy_allowed`]) and as a stop-list
/// ([`ViewMut::copy_until`]).
///
/// [`ViewMut::copy_allowed`]: crate::ViewMut::copy_allowed
/// [`ViewMut::copy_until`]: crate::ViewMut::copy_until
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    /// The empty set.
    pub const EMPTY: ByteSet = ByteSet([0; 4]);

    /// `isspace` in the C locale: space, `\t`, `\n`, `\v`, `\f`, `\r`.
    pub const WHITESPACE: ByteSet = ByteSet::from_bytes(b" \t\n\x0b\x0c\r");

    /// ASCII decimal digits.
    pub const DIGITS: ByteSet = ByteSet::from_range(b'0', b'9');

    /// Characters that may appear in a decimal floating-point literal.
    pub const FLOAT: ByteSet = ByteSet::DIGITS.union(ByteSet::from_bytes(b"+-.eE"));

    /// Builds a set containing each byte of `bytes`.
    #[must_use]
    pub const fn from_bytes(bytes: &[u8]) -> Self {
        let mut words = [0u64; 4];
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            words[(b >> 6) as usize] |= 1 << (b & 63);
            i += 1;
        }
        ByteSet(words)
    }

    /// Builds a set containing every byte in `lo..=hi`.
    #[must_use]
    pub const fn from_range(lo: u8, hi: u8) -> Self {
        let mut words = [0u64; 4];
        let mut b = lo;
        while b <= hi {
            words[(b >> 6) as usize] |= 1 << (b & 63);
            if b == u8::MAX {
                break;
            }
            b += 1;
        }
        ByteSet(words)
    }

    /// Set union.
    #[must_use]
    pub const fn union(self, other: ByteSet) -> Self {
        ByteSet([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
            self.0[3] | other.0[3],
        ])
    }

    /// Set complement.
    #[must_use]
    pub const fn complement(self) -> Self {
        ByteSet([!self.0[0], !self.0[1], !self.0[2], !self.0[3]])
    }

    /// Adds `b` to the set.
    pub fn insert(&mut self, b: u8) {
        self.0[usize::from(b >> 6)] |= 1 << (b & 63);
    }

    /// Whether `b` is a member.
    #[inline]
    #[must_use]
    pub const fn contains(&self, b: u8) -> bool {
        self.0[(b >> 6) as usize] & (1 << (b & 63)) != 0
    }

    /// Length of the longest prefix of `bytes` made only of members.
    #[inline]
    pub(crate) fn span(&self, bytes: &[u8]) -> usize {
        bytes
            .iter()
            .position(|&b| !self.contains(b))
            .unwrap_or(bytes.len())
    }

    /// Length of the longest prefix of `bytes` containing no member.
    #[inline]
    pub(crate) fn span_until(&self, bytes: &[u8]) -> usize {
        bytes
            .iter()
            .position(|&b| self.contains(b))
            .unwrap_or(bytes.len())
    }

    fn iter(&self) -> impl Iterator<Item = u8> {
        (0..=u8::MAX).filter(move |&b| self.contains(b))
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(char::from)).finish()
    }
}

impl FromIterator<u8> for ByteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = ByteSet::EMPTY;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_class_covers_literal_alphabet() {
        for b in b"0123456789+-.eE" {
            assert!(ByteSet::FLOAT.contains(*b), "{}", *b as char);
        }
        assert!(!ByteSet::FLOAT.contains(b'x'));
        assert!(!ByteSet::FLOAT.contains(b' '));
    }

    #[test]
    fn spans_stop_at_first_mismatch() {
        let comma = ByteSet::from_bytes(b",");
        assert_eq!(comma.span_until(b"abc,def"), 3);
        assert_eq!(ByteSet::DIGITS.span(b"123abc"), 3);
        assert_eq!(ByteSet::DIGITS.span(b"123"), 3);
        assert_eq!(ByteSet::DIGITS.span(b""), 0);
    }

    #[test]
    fn range_reaches_top_byte() {
        let high = ByteSet::from_range(0xf0, 0xff);
        assert!(high.contains(0xff));
        assert!(high.contains(0xf0));
        assert!(!high.contains(0xef));
        assert_eq!(high.complement().span(&[0x00, 0xef, 0xf0]), 2);
    }
}
