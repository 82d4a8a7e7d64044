//! Bounded copies out of a view.
//!
//! Every copy takes a length bound where [`ALL`](crate::ALL) means "whatever
//! remains", never reads past the view's end, and advances the cursor by
//! exactly the bytes it copied (unless the view is in no-advance mode).
//! Copies into a caller slice always NUL-terminate it and reserve the last
//! byte of its capacity for that.

use bstr::BString;

use crate::{ALL, byte_set::ByteSet, error::CopyError, view::ViewMut};

impl ViewMut<'_, '_> {
    fn requested(&self, len: usize) -> usize {
        if len == ALL { self.remaining() } else { len }
    }

    /// `len` trimmed to the available data and to `capacity`.
    fn bounded(&self, len: usize, capacity: usize) -> usize {
        len.min(capacity).min(self.remaining())
    }

    fn emit(&mut self, out: &mut [u8], n: usize) -> usize {
        out[..n].copy_from_slice(&self.current()[..n]);
        out[n] = 0;
        self.advance(n)
    }

    /// Copies exactly `len` bytes into `out`, followed by a terminator.
    ///
    /// Nothing is written and the cursor stays put on failure.
    ///
    /// # Errors
    ///
    /// - [`CopyError::OutputTooSmall`] if `out` cannot hold `len` bytes plus
    ///   the terminator; `needed` is the number of extra bytes a retry needs.
    /// - [`CopyError::Insufficient`] if fewer than `len` bytes remain.
    ///
    /// ```rust
    /// use bufview::{ALL, Buffer, CopyError};
    ///
    /// let mut buf = Buffer::from("i am a longer test string");
    /// let mut out = [0u8; 19];
    /// let err = buf.root_view().copy_exact(&mut out, ALL).unwrap_err();
    /// assert_eq!(err, CopyError::OutputTooSmall { needed: 7 });
    /// assert_eq!(err.signed(), -7);
    /// ```
    pub fn copy_exact(&mut self, out: &mut [u8], len: usize) -> Result<usize, CopyError> {
        let len = self.requested(len);
        let Some(capacity) = out.len().checked_sub(1) else {
            return Err(CopyError::OutputTooSmall {
                needed: len.saturating_add(1),
            });
        };
        if len > capacity {
            return Err(CopyError::OutputTooSmall {
                needed: len - capacity,
            });
        }
        let available = self.remaining();
        if len > available {
            return Err(CopyError::Insufficient {
                requested: len,
                available,
            });
        }
        Ok(self.emit(out, len))
    }

    /// Copies as many of the next `len` bytes as fit in `out`.
    ///
    /// Returns the number of bytes copied, `0` if `out` is empty (in which
    /// case it is left untouched) or nothing remains.
    pub fn copy(&mut self, out: &mut [u8], len: usize) -> usize {
        let Some(capacity) = out.len().checked_sub(1) else {
            return 0;
        };
        let n = self.bounded(len, capacity);
        self.emit(out, n)
    }

    /// Like [`copy`](Self::copy), but stops at the first byte not in
    /// `allowed`.
    pub fn copy_allowed(&mut self, out: &mut [u8], len: usize, allowed: &ByteSet) -> usize {
        let Some(capacity) = out.len().checked_sub(1) else {
            return 0;
        };
        let n = self.bounded(len, capacity);
        let n = allowed.span(&self.current()[..n]);
        self.emit(out, n)
    }

    /// Like [`copy`](Self::copy), but stops at the first byte in `stop`,
    /// leaving the cursor on it.
    ///
    /// ```rust
    /// use bufview::{ALL, Buffer, ByteSet};
    ///
    /// let mut buf = Buffer::from("abc,def");
    /// let mut view = buf.root_view();
    /// let mut out = [0u8; 16];
    /// assert_eq!(view.copy_until(&mut out, ALL, &ByteSet::from_bytes(b",")), 3);
    /// assert_eq!(&out[..4], b"abc\0");
    /// assert_eq!(view.current(), b",def");
    /// ```
    pub fn copy_until(&mut self, out: &mut [u8], len: usize, stop: &ByteSet) -> usize {
        let Some(capacity) = out.len().checked_sub(1) else {
            return 0;
        };
        let n = self.bounded(len, capacity);
        let n = stop.span_until(&self.current()[..n]);
        self.emit(out, n)
    }

    fn take_n(&mut self, n: usize) -> BString {
        let out = BString::from(&self.current()[..n]);
        self.advance(n);
        out
    }

    /// Owned counterpart of [`copy_exact`](Self::copy_exact).
    ///
    /// # Errors
    ///
    /// [`CopyError::Insufficient`] if fewer than `len` bytes remain.
    pub fn take_exact(&mut self, len: usize) -> Result<BString, CopyError> {
        let len = self.requested(len);
        let available = self.remaining();
        if len > available {
            return Err(CopyError::Insufficient {
                requested: len,
                available,
            });
        }
        Ok(self.take_n(len))
    }

    /// Owned counterpart of [`copy`](Self::copy).
    pub fn take(&mut self, len: usize) -> BString {
        let n = self.bounded(len, usize::MAX);
        self.take_n(n)
    }

    /// Owned counterpart of [`copy_allowed`](Self::copy_allowed).
    pub fn take_allowed(&mut self, len: usize, allowed: &ByteSet) -> BString {
        let n = self.bounded(len, usize::MAX);
        let n = allowed.span(&self.current()[..n]);
        self.take_n(n)
    }

    /// Owned counterpart of [`copy_until`](Self::copy_until).
    pub fn take_until(&mut self, len: usize, stop: &ByteSet) -> BString {
        let n = self.bounded(len, usize::MAX);
        let n = stop.span_until(&self.current()[..n]);
        self.take_n(n)
    }
}
