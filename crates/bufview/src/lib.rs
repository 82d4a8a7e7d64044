//! Bounds-checked, growable byte buffer views.
//!
//! A [`Buffer`] owns (or borrows) one byte region and a tree of views into
//! it. Each view is a cursor with its own window; child views start where
//! their parent stands and, unless created as peeks, drag the parent along as
//! they advance. Markers save positions that survive growth and compaction of
//! the region.
//!
//! ```rust
//! use bufview::{ALL, Buffer, ByteSet, GrowthOptions, Trailing};
//!
//! let mut input = Buffer::from("port=8080;host=example");
//! let mut view = input.root_view();
//! assert!(view.advance_past(b"port="));
//! let (port, _) = view.parse::<u16>(Trailing::Allow).unwrap();
//! assert!(view.next_if(b';'));
//! let pair = view.take_until(ALL, &ByteSet::from_bytes(b";"));
//! assert_eq!(pair, "host=example");
//!
//! let mut out = Buffer::growable(GrowthOptions::with_floor(8)).unwrap();
//! out.root_view().append_str(&port.to_string()).unwrap();
//! assert_eq!(out.as_bstr(), "8080");
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod byte_set;
mod error;
pub mod escape;
mod number;
mod options;
mod read;
mod search;
mod slots;
mod storage;
mod view;
mod write;

#[cfg(test)]
mod tests;

pub use bstr::{BStr, BString};
pub use buffer::{Buffer, MarkerId, ViewId, ViewInfo};
pub use byte_set::ByteSet;
pub use error::{BufferError, CopyError, NumberError, ParseErrorKind, ParseStatus, WriteError};
pub use number::{Number, Trailing};
pub use options::GrowthOptions;
pub use view::ViewMut;
pub use write::PrintScratch;

/// Length argument meaning "everything that remains".
pub const ALL: usize = usize::MAX;
