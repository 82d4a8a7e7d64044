#![allow(missing_docs)]

use core::fmt;

use thiserror::Error;

/// Capacity and lifecycle failures reported by a [`Buffer`](crate::Buffer).
///
/// The growth variants are also recorded in the buffer's most-recent-error
/// slot so a caller that only looked at a short count can still format a
/// diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The region is already at its ceiling.
    #[error("failed extending buffer by {requested} bytes to {total} bytes, max is {ceiling} bytes")]
    CeilingReached {
        requested: usize,
        total: usize,
        ceiling: usize,
    },
    /// The allocator refused.
    #[error("failed extending buffer by {requested} bytes to {total} bytes")]
    AllocFailed { requested: usize, total: usize },
    /// The region is fixed size, or the view does not reach its end.
    #[error("buffer is fixed size, cannot extend by {requested} bytes")]
    NotExtensible { requested: usize },
    #[error("buffer is read-only")]
    ReadOnly,
    #[error("fixed buffer must have room for a terminator")]
    NoTerminatorRoom,
    /// Positions or markers pointed past the new end of the region.
    #[error("{clamped} position(s) fell past the end of the buffer and were clamped")]
    Clamped { clamped: usize },
    #[error("the root view cannot be released")]
    RootRelease,
}

/// Why an exact copy out of a view failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyError {
    /// Fewer bytes remain than were requested.
    #[error("insufficient data: requested {requested} bytes, {available} available")]
    Insufficient { requested: usize, available: usize },
    /// The destination cannot hold the copy and its terminator.
    #[error("output buffer too small, {needed} more bytes required")]
    OutputTooSmall { needed: usize },
}

impl CopyError {
    /// The C-style signed return: `0` for insufficient input, `-needed` for a
    /// short destination.
    #[must_use]
    pub fn signed(&self) -> isize {
        match *self {
            CopyError::Insufficient { .. } => 0,
            CopyError::OutputTooSmall { needed } => negate(needed),
        }
    }
}

/// Why a write into a view failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    #[error("view is read-only")]
    ReadOnly,
    /// The view could not be made large enough.
    #[error("insufficient buffer space, {needed} more bytes required")]
    Short { needed: usize },
    #[error("formatting failed")]
    Format,
}

impl WriteError {
    /// Additional bytes a retry would need, if the failure was a shortfall.
    #[must_use]
    pub fn needed(&self) -> Option<usize> {
        match *self {
            WriteError::Short { needed } => Some(needed),
            WriteError::ReadOnly | WriteError::Format => None,
        }
    }

    /// The C-style signed return: `-needed` for a shortfall, `0` otherwise.
    #[must_use]
    pub fn signed(&self) -> isize {
        self.needed().map_or(0, negate)
    }
}

impl From<fmt::Error> for WriteError {
    fn from(_: fmt::Error) -> Self {
        WriteError::Format
    }
}

fn negate(n: usize) -> isize {
    isize::try_from(n).map_or(isize::MIN, |n| -n)
}

/// The closed set of numeric parse failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseErrorKind {
    /// No digits at the cursor.
    #[error("token not found")]
    NotFound,
    #[error("integer overflow")]
    NumOverflow,
    #[error("integer underflow")]
    NumUnderflow,
    #[error("trailing data")]
    Trailing,
}

/// Outcome of a numeric parse in table form, `Ok` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseStatus {
    Ok,
    Error(ParseErrorKind),
}

impl ParseStatus {
    /// Every status, in the order diagnostics list them.
    pub const ALL: [ParseStatus; 5] = [
        ParseStatus::Ok,
        ParseStatus::Error(ParseErrorKind::NotFound),
        ParseStatus::Error(ParseErrorKind::NumOverflow),
        ParseStatus::Error(ParseErrorKind::NumUnderflow),
        ParseStatus::Error(ParseErrorKind::Trailing),
    ];

    /// Status of a parse result.
    pub fn of<T, E>(res: &Result<T, NumberError<E>>) -> Self {
        match res {
            Ok(_) => ParseStatus::Ok,
            Err(e) => ParseStatus::Error(e.kind),
        }
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStatus::Ok => f.write_str("ok"),
            ParseStatus::Error(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

/// A failed numeric parse.
///
/// `value` carries the clamped output for range errors and the converted
/// value for [`ParseErrorKind::Trailing`], mirroring what a caller that
/// chooses to ignore the error would receive.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("{kind}")]
pub struct NumberError<T> {
    pub kind: ParseErrorKind,
    /// What the output would have been.
    pub value: Option<T>,
}

impl<T> NumberError<T> {
    pub(crate) fn new(kind: ParseErrorKind) -> Self {
        Self { kind, value: None }
    }

    pub(crate) fn with_value(kind: ParseErrorKind, value: T) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }
}
