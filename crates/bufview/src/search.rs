//! Searching and skipping within a view.

use bstr::ByteSlice;

use crate::{byte_set::ByteSet, view::ViewMut};

impl ViewMut<'_, '_> {
    /// The byte under the cursor, if any.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.current().first().copied()
    }

    /// Advances past `literal` if the unread bytes begin with it.
    ///
    /// ```rust
    /// use bufview::Buffer;
    ///
    /// let mut buf = Buffer::from("GET /index");
    /// let mut view = buf.root_view();
    /// assert!(!view.advance_past(b"POST"));
    /// assert!(view.advance_past(b"GET "));
    /// assert_eq!(view.current(), b"/index");
    /// ```
    pub fn advance_past(&mut self, literal: &[u8]) -> bool {
        if !self.current().starts_with(literal) {
            return false;
        }
        self.advance(literal.len());
        true
    }

    /// [`advance_past`](Self::advance_past), ignoring ASCII case.
    pub fn advance_past_ignore_case(&mut self, literal: &[u8]) -> bool {
        let matched = self
            .current()
            .get(..literal.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(literal));
        if matched {
            self.advance(literal.len());
        }
        matched
    }

    /// Moves the cursor to the next occurrence of `byte`.
    ///
    /// Returns the distance moved, or `None` (cursor unchanged) if `byte`
    /// does not occur before the end of the view.
    pub fn advance_to_byte(&mut self, byte: u8) -> Option<usize> {
        let k = self.current().find_byte(byte)?;
        Some(self.advance(k))
    }

    /// Moves the cursor to the start of the next occurrence of `needle`.
    pub fn advance_to(&mut self, needle: &[u8]) -> Option<usize> {
        let k = self.current().find(needle)?;
        Some(self.advance(k))
    }

    /// Moves the cursor to the next occurrence of `ch` that starts on a
    /// UTF-8 character boundary. Invalid bytes are stepped over one at a
    /// time.
    pub fn advance_to_char(&mut self, ch: char) -> Option<usize> {
        let mut encoded = [0u8; 4];
        let needle = ch.encode_utf8(&mut encoded).as_bytes();

        let current = self.current();
        let mut at = 0;
        while at < current.len() {
            let rest = &current[at..];
            if rest.starts_with(needle) {
                return Some(self.advance(at));
            }
            let (_, size) = bstr::decode_utf8(rest);
            at += size.max(1);
        }
        None
    }

    /// Advances one byte if the next byte is `byte`.
    pub fn next_if(&mut self, byte: u8) -> bool {
        if self.peek() != Some(byte) {
            return false;
        }
        self.advance(1);
        true
    }

    /// Advances one byte if there is a next byte and it is not `byte`.
    pub fn next_unless(&mut self, byte: u8) -> bool {
        match self.peek() {
            Some(b) if b != byte => {
                self.advance(1);
                true
            }
            _ => false,
        }
    }

    /// Advances over a run of bytes from `set`, returning how many.
    pub fn skip(&mut self, set: &ByteSet) -> usize {
        let n = set.span(self.current());
        self.advance(n)
    }

    /// Advances over spaces, tabs, line breaks, vertical tabs and form feeds.
    pub fn skip_whitespace(&mut self) -> usize {
        self.skip(&ByteSet::WHITESPACE)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::Buffer;

    #[rstest]
    #[case(b"foo bar", b"foo", true, 3)]
    #[case(b"foo", b"foo", true, 3)]
    #[case(b"fo", b"foo", false, 0)]
    #[case(b"bar foo", b"foo", false, 0)]
    #[case(b"", b"", true, 0)]
    fn advance_past_matches_only_at_cursor(
        #[case] input: &[u8],
        #[case] literal: &[u8],
        #[case] found: bool,
        #[case] position: usize,
    ) {
        let mut buf = Buffer::new(input);
        let mut v = buf.root_view();
        assert_eq!(v.advance_past(literal), found);
        assert_eq!(v.position(), position);
    }

    #[rstest]
    #[case(b"Content-Length: 4", b"content-length:", true)]
    #[case(b"CONTENT", b"content-length", false)]
    fn advance_past_ignore_case(#[case] input: &[u8], #[case] literal: &[u8], #[case] found: bool) {
        let mut buf = Buffer::new(input);
        assert_eq!(buf.root_view().advance_past_ignore_case(literal), found);
    }

    #[test]
    fn advance_to_reports_distance() {
        let mut buf = Buffer::from("key = value; next");
        let mut v = buf.root_view();
        assert_eq!(v.advance_to_byte(b'='), Some(4));
        assert_eq!(v.advance_to_byte(b'='), Some(0));
        assert_eq!(v.advance_to(b"; "), Some(7));
        assert_eq!(v.advance_to(b"missing"), None);
        assert_eq!(v.current(), b"; next");
    }

    #[test]
    fn advance_to_char_respects_boundaries() {
        let mut buf = Buffer::new("\u{e9}x\u{e9}".as_bytes());
        let mut v = buf.root_view();
        assert_eq!(v.advance_to_char('x'), Some(2));
        assert_eq!(v.advance_to_char('\u{e9}'), Some(1));
        assert_eq!(v.advance_to_char('\u{a9}'), None);

        let mut buf = Buffer::new(b"\xff\xfe\xe2\x82\xac");
        assert_eq!(buf.root_view().advance_to_char('\u{20ac}'), Some(2));
    }

    #[test]
    fn conditional_steps() {
        let mut buf = Buffer::from("ab");
        let mut v = buf.root_view();
        assert!(!v.next_if(b'b'));
        assert!(v.next_if(b'a'));
        assert!(!v.next_unless(b'b'));
        assert!(v.next_unless(b'a'));
        assert!(!v.next_unless(b'a'));
        assert_eq!(v.peek(), None);
    }

    #[test]
    fn whitespace_run() {
        let mut buf = Buffer::from(" \t\r\n\x0b\x0cx ");
        let mut v = buf.root_view();
        assert_eq!(v.skip_whitespace(), 6);
        assert_eq!(v.peek(), Some(b'x'));
        assert_eq!(v.skip_whitespace(), 0);
    }
}
