//! Writes into a view.
//!
//! Every write first makes sure the view has room for the whole payload,
//! growing the region if the view reaches its end, then writes the bytes, the
//! terminator after them, and advances past the bytes. A write that cannot
//! get enough room writes nothing.

use alloc::string::String;
use core::fmt::{self, Write as _};

use bstr::BStr;

use crate::{error::WriteError, escape, view::ViewMut};

/// Reusable rendering area for [`ViewMut::print`].
///
/// Formatted output is rendered here first so its exact length is known
/// before the view is asked to make room. Keep one per worker and pass it to
/// every print; the allocation is reused across calls.
#[derive(Debug, Default, Clone)]
pub struct PrintScratch {
    text: String,
}

impl PrintScratch {
    /// An empty scratch area.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scratch area that can render `capacity` bytes without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
        }
    }

    /// Renders `args`, replacing the previous contents.
    ///
    /// # Errors
    ///
    /// [`WriteError::Format`] if a `Display` implementation failed.
    pub fn render(&mut self, args: fmt::Arguments<'_>) -> Result<&str, WriteError> {
        self.text.clear();
        self.text.write_fmt(args)?;
        Ok(&self.text)
    }
}

impl ViewMut<'_, '_> {
    /// Makes sure `len` bytes can be written at the cursor.
    fn reserve(&mut self, len: usize) -> Result<(), WriteError> {
        if self.is_const() {
            return Err(WriteError::ReadOnly);
        }
        let remaining = self.remaining();
        if len <= remaining {
            return Ok(());
        }
        // A refusal is recorded on the buffer; the shortfall below is what
        // the caller sees.
        let _ = self.extend(len - remaining);
        let remaining = self.remaining();
        if len > remaining {
            return Err(WriteError::Short {
                needed: len - remaining,
            });
        }
        Ok(())
    }

    /// Terminates the payload at `pos + len` and advances past it.
    fn commit(&mut self, len: usize) -> usize {
        let end = self.position() + len;
        if let Some(raw) = self.buf.backing.raw_mut() {
            raw[end] = 0;
        }
        self.advance(len)
    }

    /// Appends `bytes` at the cursor.
    ///
    /// # Errors
    ///
    /// - [`WriteError::ReadOnly`] for const views.
    /// - [`WriteError::Short`] if the view could not be made large enough;
    ///   `needed` is the number of bytes still missing.
    pub fn append(&mut self, bytes: &[u8]) -> Result<usize, WriteError> {
        self.reserve(bytes.len())?;
        if let Some(window) = self.remaining_mut() {
            window[..bytes.len()].copy_from_slice(bytes);
        }
        Ok(self.commit(bytes.len()))
    }

    /// Appends a string. See [`append`](Self::append).
    ///
    /// # Errors
    ///
    /// As for [`append`](Self::append).
    pub fn append_str(&mut self, s: &str) -> Result<usize, WriteError> {
        self.append(s.as_bytes())
    }

    /// Appends a byte string. See [`append`](Self::append).
    ///
    /// # Errors
    ///
    /// As for [`append`](Self::append).
    pub fn append_bstr(&mut self, s: &BStr) -> Result<usize, WriteError> {
        self.append(s)
    }

    /// Renders `args` into `scratch`, then appends the result.
    ///
    /// The [`bufprint!`](crate::bufprint) macro builds the arguments.
    ///
    /// # Errors
    ///
    /// [`WriteError::Format`] if rendering failed, otherwise as for
    /// [`append`](Self::append).
    pub fn print(
        &mut self,
        scratch: &mut PrintScratch,
        args: fmt::Arguments<'_>,
    ) -> Result<usize, WriteError> {
        let text = scratch.render(args)?;
        self.append(text.as_bytes())
    }

    /// Appends `input` escaped for the given quote character; see
    /// [`escape`](crate::escape) for the rules. `None` appends verbatim.
    ///
    /// The exact escaped length is computed first and reserved in one go.
    ///
    /// # Errors
    ///
    /// As for [`append`](Self::append).
    pub fn print_escaped(&mut self, input: &[u8], quote: Option<u8>) -> Result<usize, WriteError> {
        let len = escape::escaped_len(input, quote);
        self.reserve(len)?;
        if let Some(window) = self.remaining_mut() {
            escape::escape_into(input, quote, &mut window[..len]);
        }
        Ok(self.commit(len))
    }
}

/// Formats into a view through a [`PrintScratch`].
///
/// ```rust
/// use bufview::{Buffer, GrowthOptions, PrintScratch, bufprint};
///
/// let mut buf = Buffer::growable(GrowthOptions::default()).unwrap();
/// let mut scratch = PrintScratch::new();
/// let mut view = buf.root_view();
/// bufprint!(view, &mut scratch, "{}-{:02}", "id", 7).unwrap();
/// assert_eq!(view.as_bstr(), "id-07");
/// ```
#[macro_export]
macro_rules! bufprint {
    ($view:expr, $scratch:expr, $($arg:tt)*) => {
        $view.print($scratch, ::core::format_args!($($arg)*))
    };
}
